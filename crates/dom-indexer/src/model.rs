use serde::{Deserialize, Serialize};

/// Hard cap on items collected per scan; the summary marks truncation when
/// the scan filled up.
pub const MAX_SCAN_ITEMS: usize = 600;

/// One element as reported by the injected scan.
///
/// Interactive items carry the identifier stamped onto the element; context
/// lines come back with `id` 0 and `interactive` false.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannedElement {
    pub id: u32,
    pub tag: String,
    pub text: String,
    #[serde(default)]
    pub interactive: bool,
}
