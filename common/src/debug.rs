use crossbeam_channel::{unbounded, Receiver, Sender};
use lazy_static::lazy_static;
use std::{collections::BTreeMap, sync::RwLock};
lazy_static! {
    static ref DEBUG_INFO: RwLock<Option<Sender<DebugInfoUnit>>> = RwLock::new(None);
}

#[derive(Debug, Clone)]
struct DebugInfoUnit {
    pub section: String,
    pub id: String,
    pub message: String,
}

/// Helper struct allowing multiple threads to easily show debug info.
/// There can only be one active `DebugInfo` at any time.
pub struct DebugInfo {
    receiver: Receiver<DebugInfoUnit>,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl DebugInfo {
    /// Create a new `DebugInfo` struct and make it the current one.
    pub fn new_current() -> Self {
        let (sender, receiver) = unbounded();
        match DEBUG_INFO.write() {
            Ok(mut current) => *current = Some(sender),
            Err(poisoned) => *poisoned.into_inner() = Some(sender),
        }
        Self {
            receiver,
            sections: BTreeMap::new(),
        }
    }

    /// Get the debug info: for every section, the last message of every id.
    pub fn get_debug_info(&mut self) -> &BTreeMap<String, BTreeMap<String, String>> {
        while let Ok(diu) = self.receiver.try_recv() {
            self.sections
                .entry(diu.section)
                .or_insert_with(BTreeMap::new)
                .insert(diu.id, diu.message);
        }
        &self.sections
    }
}

/// Send debug info to the current `DebugInfo` if there is one
pub fn send_debug_info(section: impl ToString, id: impl ToString, message: impl ToString) {
    if let Ok(current) = DEBUG_INFO.read() {
        if let Some(sender) = current.as_ref() {
            // The receiving side may be gone, debug info is best effort
            let _ = sender.send(DebugInfoUnit {
                section: section.to_string(),
                id: id.to_string(),
                message: message.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_last_message_per_id() {
        let mut info = DebugInfo::new_current();
        send_debug_info("Tests", "counter", "1");
        send_debug_info("Tests", "counter", "2");
        send_debug_info("Tests", "other", "x");
        let sections = info.get_debug_info();
        let tests = &sections["Tests"];
        assert_eq!(tests["counter"], "2");
        assert_eq!(tests["other"], "x");
    }
}
