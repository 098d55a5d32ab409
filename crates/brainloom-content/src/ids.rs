//! Identifier generation for blocks, snippets and carousel images.
//!
//! Ids only need to be unique within one document's lifetime. They are never
//! persisted in markup, so a fresh set is generated on every parse.

use uuid::Uuid;

use crate::blocks::BlockId;

/// Length of a generated random id.
pub const ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait IdGenerator {
    fn generate(&mut self) -> BlockId;
}

/// Short base36 tokens drawn from uuid v4 entropy. Not cryptographically meaningful.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&mut self) -> BlockId {
        let mut n = Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(ID_LEN);
        for _ in 0..ID_LEN {
            id.push(ALPHABET[(n % 36) as usize] as char);
            n /= 36;
        }
        BlockId::new(id)
    }
}

/// Counter-backed ids (`{prefix}1`, `{prefix}2`, ...), deterministic across runs.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("b")
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self) -> BlockId {
        let id = BlockId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
