use srcaudit_core::matching::{wrapper_marker_match, SourceFile, SyntaxMatcher};

fn file(text: &str) -> SourceFile {
    SourceFile::from_text("test.c", text)
}

fn default_markers() -> Vec<String> {
    srcaudit_core::config::VerifierConfig::default().wrapper_markers
}

#[test]
fn finds_simple_definition_with_line() {
    let src = file("int main() {\n    return 0;\n}\n");
    let index = SyntaxMatcher::new().definitions(&src).expect("parse");
    assert!(index.contains("main"));
    assert_eq!(index.lines_of("main"), vec![1]);
}

#[test]
fn finds_definition_anywhere_in_file() {
    let src = file(
        "#include <stdio.h>\n\nstatic int helper(int x)\n{\n    return x + 1;\n}\n\nint main(void)\n{\n    return helper(1);\n}\n",
    );
    let matcher = SyntaxMatcher::new();
    assert!(matcher.matches(&src, "helper"));
    assert!(matcher.matches(&src, "main"));
    let index = matcher.definitions(&src).unwrap();
    assert_eq!(index.lines_of("helper"), vec![3]);
    assert_eq!(index.lines_of("main"), vec![8]);
}

#[test]
fn follows_pointer_return_declarators() {
    let src = file("static char *\ndup_name(const char *s)\n{\n    return (char *)s;\n}\n");
    let index = SyntaxMatcher::new().definitions(&src).unwrap();
    assert!(index.contains("dup_name"));
    assert_eq!(index.lines_of("dup_name"), vec![2]);
}

#[test]
fn finds_definitions_inside_preprocessor_conditionals() {
    let src = file("#ifdef HAVE_GUARD\nint guarded(void)\n{\n    return 1;\n}\n#endif\n");
    assert!(SyntaxMatcher::new().matches(&src, "guarded"));
}

#[test]
fn prototypes_and_calls_are_not_definitions() {
    let src = file("int proto(void);\n\nint caller(void)\n{\n    return callee() + proto();\n}\n");
    let matcher = SyntaxMatcher::new();
    assert!(!matcher.matches(&src, "proto"));
    assert!(!matcher.matches(&src, "callee"));
    assert!(matcher.matches(&src, "caller"));
}

#[test]
fn matching_is_case_sensitive_and_exact() {
    let src = file("int Main(void) { return 0; }\nint main_loop(void) { return 0; }\n");
    let matcher = SyntaxMatcher::new();
    assert!(!matcher.matches(&src, "main"));
    assert!(matcher.matches(&src, "Main"));
    assert!(matcher.matches(&src, "main_loop"));
}

#[test]
fn wrapper_marker_checks_next_non_blank_line() {
    let src = file(
        "__extern_always_inline int\n\n__NTH (getpid_wrapper (void))\n{\n    return 0;\n}\n",
    );
    let markers = default_markers();
    assert!(wrapper_marker_match(&src, "getpid_wrapper", &markers));
    assert!(!wrapper_marker_match(&src, "getpid", &markers));
}

#[test]
fn wrapper_marker_requires_marker_line() {
    let src = file("int\n__NTH (plain_fn (void))\n{\n    return 0;\n}\n");
    assert!(!wrapper_marker_match(&src, "plain_fn", &default_markers()));
}

#[test]
fn wrapper_marker_only_inspects_the_following_line() {
    let src = file("__extern_inline int\nfirst_line (void);\nsecond_line (void)\n");
    let markers = default_markers();
    assert!(wrapper_marker_match(&src, "first_line", &markers));
    assert!(!wrapper_marker_match(&src, "second_line", &markers));
}
