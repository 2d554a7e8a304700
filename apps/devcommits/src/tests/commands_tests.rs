use super::*;

#[test]
fn parses_field_commands_with_free_text() {
    assert_eq!(
        parse("message  fix flaky login test ").expect("message"),
        Command::Message("fix flaky login test".into())
    );
    assert_eq!(
        parse("tags api, ui").expect("tags"),
        Command::Tags("api, ui".into())
    );
    assert_eq!(parse("description").expect("desc"), Command::Description(String::new()));
}

#[test]
fn login_accepts_zero_or_two_arguments() {
    assert_eq!(parse("login").expect("login"), Command::Login(None));
    assert_eq!(
        parse("login dev@example.com hunter2").expect("login"),
        Command::Login(Some(("dev@example.com".into(), "hunter2".into())))
    );
    assert_eq!(parse("login dev@example.com"), Err(CommandError::LoginUsage));
}

#[test]
fn type_parses_category_names() {
    assert_eq!(parse("type crash").expect("type"), Command::Type(Category::Crash));
    assert!(matches!(parse("type chore"), Err(CommandError::Category(_))));
    assert_eq!(parse("type"), Err(CommandError::MissingValue("type")));
}

#[test]
fn blank_and_unknown_lines() {
    assert_eq!(parse("   ").expect("blank"), Command::Nothing);
    assert_eq!(parse("QUIT").expect("quit"), Command::Quit);
    assert_eq!(
        parse("deploy now"),
        Err(CommandError::Unknown("deploy".into()))
    );
}
