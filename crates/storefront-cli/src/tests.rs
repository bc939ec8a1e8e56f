use super::*;

#[test]
fn parses_name_command_for_an_appid() {
    let cli = Cli::try_parse_from(["storefront-cli", "--appid", "203160", "name"])
        .expect("expected valid cli args");

    assert_eq!(cli.target.appid.as_deref(), Some("203160"));
    assert_eq!(cli.category, Category::App);
    assert!(matches!(cli.command, Commands::Name));
}

#[test]
fn category_accepts_sub_as_package() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "54029",
        "--category",
        "sub",
        "raw",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.category, Category::Package);
}

#[test]
fn target_flags_are_mutually_exclusive() {
    let result = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "400",
        "--name",
        "Portal",
        "name",
    ]);
    assert!(result.is_err());
}

#[test]
fn a_target_is_required() {
    assert!(Cli::try_parse_from(["storefront-cli", "name"]).is_err());
}

#[test]
fn parses_description_format_and_short_flag() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "--url",
        "store.steampowered.com/app/203160",
        "description",
        "--format",
        "normal",
        "--short",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Description {
            format: TextFormat::Normal,
            short: true
        }
    ));
}

#[test]
fn description_format_defaults_to_raw() {
    let cli = Cli::try_parse_from(["storefront-cli", "--appid", "400", "description"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Description {
            format: TextFormat::Raw,
            short: false
        }
    ));
}

#[test]
fn rejects_unknown_format() {
    let result = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "400",
        "reviews",
        "--format",
        "markdown",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_requirements_platform() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "203160",
        "requirements",
        "--platform",
        "mac",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Requirements {
            platform: RequirementPlatform::Mac
        }
    ));
}

#[test]
fn parses_price_currency() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "203160",
        "price",
        "--currency",
        "in",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Price { currency: Some(ref cc) } if cc == "in"
    ));
}

#[test]
fn parses_bundle_items() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "--appid",
        "2823",
        "--category",
        "bundle",
        "bundle-items",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.category, Category::Bundle);
    assert!(matches!(cli.command, Commands::BundleItems));
}
