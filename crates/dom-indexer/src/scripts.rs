//! The injected snapshot scan.
//!
//! Evaluated in the page on every capture. It clears the previous
//! generation's markers, walks every visible element in document order, and
//! stamps sequential `data-pilot-id` markers onto interactive elements while
//! collecting one summary item per element. Classification precedence (first
//! match wins): rich editable surfaces, native inputs, custom checkboxes,
//! anchors, buttons, generic pointer-cursor containers. Returns the item
//! array as a JSON string.

pub const SCAN_SCRIPT: &str = r#"(function() {
    const MAX_ITEMS = 600;

    document.querySelectorAll('[data-pilot-id]').forEach(el => el.removeAttribute('data-pilot-id'));

    const items = [];
    let nextId = 1;
    const seen = new Set();

    function isVisible(el) {
        const rect = el.getBoundingClientRect();
        if (rect.width < 1 || rect.height < 1) return false;
        const style = window.getComputedStyle(el);
        return style.visibility !== 'hidden' && style.display !== 'none' && style.opacity !== '0';
    }

    function clean(text, max) {
        return (text || '').replace(/[\n\r]+/g, ' ').trim().substring(0, max);
    }

    function hasCapturedAncestor(el) {
        let parent = el.parentElement;
        while (parent && parent !== document.body) {
            if (seen.has(parent)) return true;
            parent = parent.parentElement;
        }
        return false;
    }

    function mark(el) {
        const id = nextId++;
        el.setAttribute('data-pilot-id', String(id));
        seen.add(el);
        return id;
    }

    for (const el of document.body.querySelectorAll('*')) {
        if (items.length >= MAX_ITEMS) break;
        if (seen.has(el)) continue;
        if (!isVisible(el)) continue;

        const tag = el.tagName.toLowerCase();
        const role = el.getAttribute('role');
        const className = (el.className && typeof el.className === 'string') ? el.className.toLowerCase() : '';
        const style = window.getComputedStyle(el);
        const pointer = style.cursor === 'pointer';

        // Rich editable text surfaces: contenteditable regions, ARIA
        // textboxes, clickable placeholder-style spans (chat-app composers).
        const editable = el.getAttribute('contenteditable') === 'true' || el.isContentEditable;
        const placeholderLike = className.includes('placeholder');
        if (editable || role === 'textbox' || (placeholderLike && pointer)) {
            if (el.parentElement && seen.has(el.parentElement)) continue;
            const id = mark(el);
            let label = el.innerText || el.getAttribute('aria-label') || el.getAttribute('placeholder') || '';
            if (!label.trim()) {
                const inner = el.querySelector('[class*="placeholder"]');
                if (inner) label = inner.innerText;
            }
            items.push({ id: id, tag: 'input', text: '[INPUT] ' + (clean(label, 50) || 'Message Input'), interactive: true });
            continue;
        }

        if (tag === 'input' || tag === 'textarea') {
            const id = mark(el);
            if (el.type === 'checkbox' || el.type === 'radio') {
                let label = '';
                if (el.labels && el.labels.length > 0) label = el.labels[0].innerText;
                const state = el.checked ? ' (V)' : ' ( )';
                items.push({ id: id, tag: 'checkbox', text: '[SELECT] ' + (clean(label, 50) || 'Checkbox') + state, interactive: true });
            } else if (el.type === 'submit' || el.type === 'button') {
                items.push({ id: id, tag: 'button', text: '[ACTION] ' + (clean(el.value, 50) || 'Button'), interactive: true });
            } else {
                const label = el.placeholder || el.value || '';
                items.push({ id: id, tag: 'input', text: '[INPUT] ' + (clean(label, 50) || 'Text Field'), interactive: true });
            }
            continue;
        }

        // Custom checkbox/radio widgets without a native input inside.
        const checkboxLike = className.includes('checkbox') || role === 'checkbox' || role === 'radio';
        if (checkboxLike && !el.querySelector('input')) {
            const id = mark(el);
            const selected = className.includes('active') || className.includes('checked') || el.getAttribute('aria-checked') === 'true';
            const state = selected ? ' [V]' : ' [ ]';
            items.push({ id: id, tag: 'custom-checkbox', text: '[SELECT] ' + (clean(el.innerText, 50) || 'Option') + state, interactive: true });
            continue;
        }

        if (tag === 'a') {
            const href = el.getAttribute('href');
            // Anchors without href still count when they are wired for SPA
            // navigation.
            if (!href && !el.getAttribute('onclick') && !role && !pointer) continue;
            const id = mark(el);
            let label = el.innerText || el.getAttribute('aria-label') || el.getAttribute('title') || '';
            if (!label) {
                const img = el.querySelector('img');
                if (img) label = img.alt || 'Image Link';
            }
            items.push({ id: id, tag: 'link', text: '[NAVIGATE] ' + (clean(label, 50) || 'Link'), interactive: true });
            continue;
        }

        if (tag === 'button' || role === 'button') {
            const id = mark(el);
            const label = clean(el.innerText || el.getAttribute('aria-label') || '', 50);
            items.push({ id: id, tag: 'button', text: '[ACTION] ' + (label || 'Button'), interactive: true });
            continue;
        }

        // Generic clickable containers. Oversized boxes are page chrome,
        // not discrete controls; anything under a captured ancestor is a
        // duplicate.
        if ((tag === 'div' || tag === 'span' || tag === 'li' || tag === 'img' || tag === 'svg') && pointer) {
            const rect = el.getBoundingClientRect();
            if (rect.width > 500 && rect.height > 500) continue;
            if (hasCapturedAncestor(el)) continue;
            const id = mark(el);
            const label = clean(el.innerText || el.getAttribute('alt') || '', 40);
            items.push({ id: id, tag: 'clickable', text: '[CLICK] ' + (label || 'Item'), interactive: true });
            continue;
        }

        // Non-addressable context: visible text-bearing leaves.
        if (el.children.length === 0) {
            const text = clean(el.innerText, 100);
            if (text.length > 2) {
                items.push({ id: 0, tag: tag, text: text, interactive: false });
            }
        }
    }

    return JSON.stringify(items);
})()"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_script_manages_marker_attribute() {
        assert!(SCAN_SCRIPT.contains("data-pilot-id"));
        // A prior generation is always cleared before new ids are assigned.
        assert!(SCAN_SCRIPT.contains("removeAttribute('data-pilot-id')"));
        assert!(SCAN_SCRIPT.contains("MAX_ITEMS = 600"));
    }
}
