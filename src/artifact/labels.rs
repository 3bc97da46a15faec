//! Class label list.

/// One decimal class index per line, `0\n` through `{classes-1}\n`.
pub fn label_list(classes: usize) -> String {
    (0..classes).map(|class| format!("{class}\n")).collect()
}
