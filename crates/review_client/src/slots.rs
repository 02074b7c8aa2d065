use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotMessage {
    Error(String),
    Success(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotStatus {
    pub busy: bool,
    pub message: Option<SlotMessage>,
}

impl SlotStatus {
    pub fn error(&self) -> Option<&str> {
        match &self.message {
            Some(SlotMessage::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        match &self.message {
            Some(SlotMessage::Success(message)) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionSlots<K> {
    busy: HashSet<K>,
    messages: HashMap<K, SlotMessage>,
}

impl<K> Default for ActionSlots<K> {
    fn default() -> Self {
        Self {
            busy: HashSet::new(),
            messages: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ActionSlots<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` busy and clears its message. Returns `false` without
    /// touching anything when `key` is already busy.
    pub fn begin(&mut self, key: K) -> bool {
        if !self.busy.insert(key) {
            return false;
        }
        self.messages.remove(&key);
        true
    }

    pub fn succeed(&mut self, key: K, message: impl Into<String>) {
        self.busy.remove(&key);
        self.messages
            .insert(key, SlotMessage::Success(message.into()));
    }

    pub fn fail(&mut self, key: K, message: impl Into<String>) {
        self.busy.remove(&key);
        self.messages.insert(key, SlotMessage::Error(message.into()));
    }

    pub fn finish(&mut self, key: K) {
        self.busy.remove(&key);
        self.messages.remove(&key);
    }

    pub fn clear(&mut self, key: K) {
        self.messages.remove(&key);
    }
    pub fn is_busy(&self, key: K) -> bool {
        self.busy.contains(&key)
    }

    pub fn status(&self, key: K) -> SlotStatus {
        SlotStatus {
            busy: self.is_busy(key),
            message: self.messages.get(&key).cloned(),
        }
    }
}
