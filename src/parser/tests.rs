//! Tests for Markdown code block extraction.

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_single_block_with_language() {
    let source = "# Title\n\n```go\npackage main\n```\n";
    assert_eq!(parse(source), vec![CodeBlock::new("go", "", "package main\n")]);
}

#[test]
fn test_block_with_command() {
    let source = "```go gofmt\npackage main\n```\n";
    assert_eq!(
        parse(source),
        vec![CodeBlock::new("go", "gofmt", "package main\n")]
    );
}

#[test]
fn test_block_with_templated_command() {
    let source = "```sh echo {{lang}} {{i}}\nls\n```\n";
    let blocks = parse(source);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].language, "sh");
    assert_eq!(blocks[0].command, "echo {{lang}} {{i}}");
}

#[test]
fn test_multiple_blocks_in_document_order() {
    let source = "\
```go
package main
```

Some prose.

```python python3
print('hi')
```

```
plain
```
";
    assert_eq!(
        parse(source),
        vec![
            CodeBlock::new("go", "", "package main\n"),
            CodeBlock::new("python", "python3", "print('hi')\n"),
            CodeBlock::new("", "", "plain\n"),
        ]
    );
}

#[test]
fn test_tilde_fence() {
    let source = "~~~sh cat\necho hi\n~~~\n";
    assert_eq!(parse(source), vec![CodeBlock::new("sh", "cat", "echo hi\n")]);
}

#[test]
fn test_indented_code_block_is_ignored() {
    let source = "Paragraph.\n\n    indented code\n\n```sh\nfenced\n```\n";
    assert_eq!(parse(source), vec![CodeBlock::new("sh", "", "fenced\n")]);
}

#[test]
fn test_nested_fence_in_list() {
    let source = "- item\n\n  ```sh\n  echo nested\n  ```\n";
    assert_eq!(
        parse(source),
        vec![CodeBlock::new("sh", "", "echo nested\n")]
    );
}

#[test]
fn test_multiline_content_is_verbatim() {
    let source = "```text\nline1\n\nline3\n```\n";
    assert_eq!(parse(source)[0].content, "line1\n\nline3\n");
}

#[test]
fn test_empty_block() {
    let source = "```sh\n```\n";
    assert_eq!(parse(source), vec![CodeBlock::new("sh", "", "")]);
}

#[test]
fn test_no_blocks() {
    assert!(parse("# Just a heading\n\nAnd text.\n").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn test_command_escapes_are_kept_verbatim() {
    let source = "```sh sed 's/\\./_/g' && echo a &amp;&amp; b\nx.y\n```\n";
    assert_eq!(
        parse(source),
        vec![CodeBlock::new(
            "sh",
            r"sed 's/\./_/g' && echo a &amp;&amp; b",
            "x.y\n"
        )]
    );
}

#[test]
fn test_blockquote_fence_keeps_raw_command() {
    let source = "> ```sh printf '%s\\n' {{lang}}\n> body\n> ```\n";
    assert_eq!(
        parse(source),
        vec![CodeBlock::new("sh", r"printf '%s\n' {{lang}}", "body\n")]
    );
}

#[test]
fn test_longer_fence_info_is_read_after_whole_run() {
    let source = "~~~~~python python3 -\nprint(1)\n~~~~~\n";
    assert_eq!(
        parse(source),
        vec![CodeBlock::new("python", "python3 -", "print(1)\n")]
    );
}

#[test]
fn test_parse_info_string() {
    let cases = [
        ("", ("", "")),
        ("   ", ("", "")),
        ("go", ("go", "")),
        ("go gofmt", ("go", "gofmt")),
        ("go /usr/bin/gofmt {{content}}", ("go", "/usr/bin/gofmt {{content}}")),
        ("  python   python3 -   ", ("python", "python3 -")),
        ("sh cat | grep x", ("sh", "cat | grep x")),
    ];

    for (info, (lang, cmd)) in cases {
        assert_eq!(
            parse_info_string(info),
            (lang.to_string(), cmd.to_string()),
            "info string {:?}",
            info
        );
    }
}
