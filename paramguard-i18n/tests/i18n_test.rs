//! Integration tests for paramguard-i18n

use paramguard_i18n::*;
use std::fs;

#[test]
fn test_load_bundles_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("en.json"),
        r#"{"hello": "Hello, {name}", "apples": {"one": "{n} apple", "other": "{n} apples"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("es-MX.json"), r#"{"hello": "Hola, {name}"}"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let i18n = I18n::new().load_from_dir(dir.path()).unwrap();
    let mx = Locale::parse("es-MX").unwrap();

    assert_eq!(i18n.t_args("hello", &mx, &[("name", "Ana")]).unwrap(), "Hola, Ana");
    assert_eq!(i18n.lookup_plural("apples", 1, &mx).unwrap(), "{n} apple");
    assert_eq!(i18n.lookup_plural("apples", 4, &Locale::en()).unwrap(), "{n} apples");
    assert!(i18n.has("hello", &mx));
    assert!(!i18n.has("apples", &mx));
}

#[test]
fn test_invalid_bundle_file_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("english.json"), "{}").unwrap();

    let err = I18n::new().load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, I18nError::InvalidLocale(_)));
}

#[test]
fn test_invalid_bundle_content() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("en.json"), r#"{"count": {"several": "x"}}"#).unwrap();

    assert!(I18n::new().load_from_dir(dir.path()).is_err());
}

#[test]
fn test_missing_directory() {
    let err = I18n::new().load_from_dir("/definitely/not/here").unwrap_err();
    assert!(matches!(err, I18nError::IoError(_)));
}

#[test]
fn test_region_falls_back_to_language_bundle() {
    let i18n = I18n::new()
        .with_bundle(&Locale::en(), MessageBundle::new().with("bye", "Bye"))
        .with_bundle(&Locale::es(), MessageBundle::new().with("bye", "Adiós"));

    let ar = Locale::parse("es_AR").unwrap();
    assert_eq!(i18n.lookup("bye", &ar).unwrap(), "Adiós");
    assert_eq!(i18n.lookup("bye", &Locale::de()).unwrap(), "Bye");
    assert!(matches!(
        i18n.lookup("missing", &ar),
        Err(I18nError::MessageNotFound { .. })
    ));
}

#[test]
fn test_plural_categories_by_language() {
    assert_eq!(plural_category(1, &Locale::en()), PluralCategory::One);
    assert_eq!(plural_category(0, &Locale::en()), PluralCategory::Other);
    assert_eq!(plural_category(1, &Locale::es()), PluralCategory::One);
    assert_eq!(plural_category(5, &Locale::es()), PluralCategory::Other);
}

#[test]
fn test_finish_sentence_after_substitution() {
    let text = substitute("{name} is ready", &[("name", "")]);
    assert_eq!(finish_sentence(&text), "Is ready");
    assert_eq!(capitalize_first("élan"), "Élan");
}
