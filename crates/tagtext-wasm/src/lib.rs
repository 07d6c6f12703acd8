//! WASM bindings for tagtext.
//!
//! Tag names are passed from JavaScript as one comma-separated string
//! (`"red,bold,hover"`). Every listed tag renders as its nested text; `reset`
//! is always recognized.

use tagtext_lexer::is_valid_tag_name;
use tagtext_parser::resolver::{self, Resolvers};
use tagtext_parser::{sanitize_name, ParseError, Parser, Tag, TagResolver};
use wasm_bindgen::prelude::*;

/// Tokenize markup. Returns the token array with spans and child parts.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsError> {
    let tokens = tagtext_lexer::tokenize(source, false);
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse markup and report the outcome.
///
/// Returns `{ ok: true }` or `{ ok: false, message: string, arrow?: string }`.
#[wasm_bindgen]
pub fn check(source: &str, tags: &str, strict: bool) -> Result<JsValue, JsError> {
    let result = js_sys::Object::new();
    match native_check(source, tags, strict) {
        Ok(()) => set(&result, "ok", &JsValue::TRUE)?,
        Err(e) => {
            set(&result, "ok", &JsValue::FALSE)?;
            set(&result, "message", &e.to_string().into())?;
            if let Some(arrow) = e.arrow() {
                set(&result, "arrow", &arrow.into())?;
            }
        }
    }
    Ok(result.into())
}

/// Render markup to plain text. Throws on parse errors.
#[wasm_bindgen]
pub fn render_plain(source: &str, tags: &str, strict: bool) -> Result<String, JsError> {
    native_render(source, tags, strict).map_err(|e| JsError::new(&e.to_string()))
}

/// Remove the listed tags.
#[wasm_bindgen]
pub fn strip_tags(source: &str, tags: &str) -> Result<String, JsError> {
    let resolver = resolver_for(tags).map_err(|e| JsError::new(&e.to_string()))?;
    let known = |name: &str| resolver.has(&sanitize_name(name));
    Ok(tagtext_parser::strip_tags(source, &known))
}

/// Escape the listed tags so they read as text.
#[wasm_bindgen]
pub fn escape_tags(source: &str, tags: &str) -> Result<String, JsError> {
    let resolver = resolver_for(tags).map_err(|e| JsError::new(&e.to_string()))?;
    let known = |name: &str| resolver.has(&sanitize_name(name));
    Ok(tagtext_parser::escape_tags(source, &known))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn set(object: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsError> {
    js_sys::Reflect::set(object, &key.into(), value)
        .map(|_| ())
        .map_err(|_| JsError::new(&format!("Failed to set {key} property")))
}

// =========================================================================
// Native pipeline, shared by the exports and the tests
// =========================================================================

fn resolver_for(tags: &str) -> Result<Resolvers<String>, ParseError> {
    let mut builder = Resolvers::builder().resolver(resolver::reset());
    for name in tags.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if !is_valid_tag_name(name) {
            return Err(ParseError::new(format!("Invalid tag name: {name}")));
        }
        builder = builder.tag(name, || Tag::inserting(String::new()));
    }
    Ok(builder.build())
}

fn native_check(source: &str, tags: &str, strict: bool) -> Result<(), ParseError> {
    let resolver = resolver_for(tags)?;
    Parser::new(&resolver).strict(strict).parse(source)?;
    Ok(())
}

fn native_render(source: &str, tags: &str, strict: bool) -> Result<String, ParseError> {
    let resolver = resolver_for(tags)?;
    let tree = Parser::new(&resolver).strict(strict).parse(source)?;
    Ok(tagtext_render::render(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM): exercise the pipeline behind the exports
    // =========================================================================

    #[test]
    fn test_render_known_tags() {
        let out = native_render("<red>Hello</red> <bold>world", "red, bold", false).unwrap();
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn test_render_unknown_tags_as_text() {
        let out = native_render("<red>Hello</red>", "", false).unwrap();
        assert_eq!(out, "<red>Hello</red>");
    }

    #[test]
    fn test_render_reset_always_known() {
        let out = native_render("<red>a<reset>b", "red", false).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_check_strict() {
        assert!(native_check("<red>x</red>", "red", true).is_ok());
        let err = native_check("<red>x", "red", true).unwrap_err();
        assert_eq!(err.arrow().as_deref(), Some("^~~~^"));
    }

    #[test]
    fn test_check_lenient() {
        assert!(native_check("<red>x", "red", false).is_ok());
    }

    #[test]
    fn test_invalid_tag_name() {
        let err = resolver_for("red,a b").err().unwrap();
        assert_eq!(err.message, "Invalid tag name: a b");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_parses() {
        // No state leaks between calls.
        assert_eq!(native_render("<a>x", "a", false).unwrap(), "x");
        assert_eq!(native_render("<a>x", "b", false).unwrap(), "<a>x");
    }
}
