use super::*;

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["autopost", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run {
            max_posts: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_run_with_cap_and_dry_run() {
    let cli = Cli::try_parse_from(["autopost", "run", "--max-posts", "1", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Run {
            max_posts: Some(1),
            dry_run: true
        }
    ));
}

#[test]
fn run_rejects_zero_cap() {
    let result = Cli::try_parse_from(["autopost", "run", "--max-posts", "0"]);
    assert!(result.is_err());
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["autopost"]).is_err());
}

#[test]
fn parses_post_command() {
    let cli = Cli::try_parse_from([
        "autopost",
        "post",
        "--row-index",
        "3",
        "--description",
        "Sale 50%",
        "--tags",
        "#sale",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Post {
            row_index: 3,
            ref description,
            image_url: None,
            tags: Some(ref t),
            prompt_template: None,
            source_url: None,
        } if description == "Sale 50%" && t == "#sale"
    ));
}

#[test]
fn post_requires_description() {
    let result = Cli::try_parse_from(["autopost", "post", "--row-index", "3"]);
    assert!(result.is_err());
}

#[test]
fn post_rejects_zero_row_index() {
    let result = Cli::try_parse_from([
        "autopost",
        "post",
        "--row-index",
        "0",
        "--description",
        "Sale 50%",
    ]);
    let err = result.err().expect("row index 0 should be rejected");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}
