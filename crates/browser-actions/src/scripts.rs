//! Per-element scripts built around the snapshot marker attribute.
//!
//! Identifiers are small integers of our own making, so interpolating them
//! into selectors is injection-safe.

use dom_indexer::MARKER_ATTRIBUTE;
use webpilot_core_types::ScrollDirection;

fn by_marker(id: u32) -> String {
    format!("document.querySelector(\"[{MARKER_ATTRIBUTE}='{id}']\")")
}

/// Green outline on the element about to be clicked.
pub fn highlight_click_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (el) el.style.outline = '3px solid #00FF00'; }})()",
        by_marker(id)
    )
}

/// Blue outline on the element about to receive text.
pub fn highlight_type_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (el) el.style.outline = '3px solid blue'; }})()",
        by_marker(id)
    )
}

/// Dashed orange outline on the element being read.
pub fn highlight_read_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (el) el.style.outline = '3px dashed orange'; }})()",
        by_marker(id)
    )
}

/// Forced click: direct invocation plus a bubbling synthetic event, for
/// elements whose native click path failed.
pub fn force_click_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.click(); \
         el.dispatchEvent(new MouseEvent('click', {{ bubbles: true }})); return true; }})()",
        by_marker(id)
    )
}

/// Select the element's existing content so typed text replaces it.
pub fn select_content_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; \
         if (typeof el.select === 'function') {{ el.select(); return true; }} \
         const range = document.createRange(); range.selectNodeContents(el); \
         const selection = window.getSelection(); selection.removeAllRanges(); \
         selection.addRange(range); return true; }})()",
        by_marker(id)
    )
}

/// Read the element's text, in innerText → textContent → value priority.
pub fn read_text_script(id: u32) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return ''; \
         return el.innerText || el.textContent || el.value || ''; }})()",
        by_marker(id)
    )
}

const SCROLL_DOWN_SCRIPT: &str =
    "(() => { window.scrollBy(0, window.innerHeight * 0.7); return true; })()";

const SCROLL_UP_SCRIPT: &str =
    "(() => { window.scrollBy(0, -window.innerHeight * 0.7); return true; })()";

/// Viewport-relative scroll, ~70% of the viewport height per step.
pub fn scroll_script(direction: ScrollDirection) -> &'static str {
    match direction {
        ScrollDirection::Down => SCROLL_DOWN_SCRIPT,
        ScrollDirection::Up => SCROLL_UP_SCRIPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_target_the_marker_attribute() {
        for script in [
            highlight_click_script(7),
            highlight_type_script(7),
            highlight_read_script(7),
            force_click_script(7),
            select_content_script(7),
            read_text_script(7),
        ] {
            assert!(script.contains(MARKER_ATTRIBUTE), "missing marker: {script}");
            assert!(script.contains("'7'"), "missing id: {script}");
        }
    }

    #[test]
    fn scroll_directions_are_symmetric() {
        assert!(scroll_script(ScrollDirection::Down).contains("window.innerHeight * 0.7"));
        assert!(scroll_script(ScrollDirection::Up).contains("-window.innerHeight * 0.7"));
    }

    #[test]
    fn read_script_follows_text_priority_order() {
        let script = read_text_script(1);
        let inner = script.find("innerText").unwrap();
        let content = script.find("textContent").unwrap();
        let value = script.find("el.value").unwrap();
        assert!(inner < content && content < value);
    }
}
