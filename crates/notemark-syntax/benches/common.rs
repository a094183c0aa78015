// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note(size: usize) -> String {
    let base = "# Standup 2024-03-01 #work/standup\n\n\
                Talked to **Sam** about the *release* and ==blockers==.\n\n\
                - [x] Review PR #123\n\
                - [ ] Update `config.toml`\n  - check https://example.com/docs\n\
                1. first\n2. second\n\n\
                > Quote with a [link](https://example.com) and ~~old~~ text\n\n\
                | task | owner |\n| --- | :-: |\n| ship | me |\n\n\
                ```rust\nfn example() {\n    println!(\"#not-a-tag\");\n}\n```\n\n---\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_quote(depth: usize) -> String {
    let mut content = String::new();
    for level in 1..=depth {
        content.push_str(&"> ".repeat(level));
        content.push_str(&format!("level {} with *emphasis*\n", level));
    }
    content
}

#[allow(dead_code)]
pub fn generate_collection(notes: usize) -> Vec<String> {
    (0..notes)
        .map(|i| format!("Note {} #project/n{} #daily\n\n{}", i, i % 7, generate_note(2)))
        .collect()
}
