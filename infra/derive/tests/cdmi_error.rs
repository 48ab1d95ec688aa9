#[test]
fn cdmi_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/cdmi_error_pass.rs");
}
