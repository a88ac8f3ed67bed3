//! Integration Test: Panic Prohibition
//!
//! **Policy**: Production code MUST NOT call `unwrap()` or `expect()`.
//! Failures are returned as `Result` and reported by `main` after the
//! terminal has been restored; a panic would leave it in raw mode.
//! **Exceptions**: Test code (`#[cfg(test)]` modules and `tests/`)

use architectural_enforcement::find_violations;

fn is_panicking_call(code: &str) -> bool {
    code.contains(".unwrap()") || code.contains(".expect(")
}

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = find_violations(is_panicking_call);

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: unwrap()/expect() found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        eprintln!("\n✅ Propagate with `?` or fall back with unwrap_or/unwrap_or_else");

        panic!(
            "\nFound {} panicking call(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_panicking_call_detection() {
    assert!(is_panicking_call("let v = x.unwrap();"));
    assert!(is_panicking_call("let v = x.expect(\"present\");"));
    assert!(!is_panicking_call("let v = x.unwrap_or_default();"));
    assert!(!is_panicking_call("let v = x.unwrap_or_else(|| 0);"));
}
