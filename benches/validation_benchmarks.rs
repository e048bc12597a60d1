use criterion::{Criterion, black_box, criterion_group, criterion_main};
use paramguard::prelude::*;
use paramguard::{DefaultCoercer, Coerce, MessageCatalog, MessageKey};
use serde_json::json;

fn bench_coercion(c: &mut Criterion) {
    let mut group = c.benchmark_group("coercion");

    let valid_emails = vec![
        json!("user@example.com"),
        json!("test.user+tag@domain.co.uk"),
        json!("admin@subdomain.example.com"),
    ];

    group.bench_function("emails", |b| {
        b.iter(|| {
            for email in &valid_emails {
                DefaultCoercer.coerce(black_box(email), Some(TypeTag::Email)).unwrap();
            }
        })
    });

    group.bench_function("numeric_strings", |b| {
        let value = json!("12345.5");
        b.iter(|| DefaultCoercer.coerce(black_box(&value), Some(TypeTag::Float)))
    });

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let catalog = MessageCatalog::builtin();

    group.bench_function("labelled_en", |b| {
        let locale = Locale::en();
        b.iter(|| {
            catalog.render(
                black_box(MessageKey::ParamIsTooShort),
                &[("name", "Token"), ("minsize", "8")],
                false,
                &locale,
            )
        })
    });

    group.bench_function("anonymous_es", |b| {
        let locale = Locale::es();
        b.iter(|| catalog.render(black_box(MessageKey::ParamIsMandatory), &[], true, &locale))
    });

    group.bench_function("overflow_notice", |b| {
        let locale = Locale::en();
        b.iter(|| catalog.render_overflow_notice(black_box(7), &locale))
    });

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = ValidationEngine::new().with_locale(Locale::en());

    let rules = RuleSet::new()
        .field("username", RuleSpec::string().min_size(3).max_size(16).pattern("[a-z0-9_]+").mandatory().build().unwrap())
        .field("email", RuleSpec::email().mandatory().build().unwrap())
        .field("age", RuleSpec::positive().max_value(150.0).build().unwrap())
        .field("tags", RuleSpec::list_of(RuleSpec::string().max_size(12).build().unwrap()).build().unwrap());

    let valid = json!({
        "username": "ana_91",
        "email": "ana@example.com",
        "age": 34,
        "tags": ["rust", "climbing", "tea"],
    });
    let invalid = json!({
        "username": "A",
        "age": -1,
        "tags": ["rust", "way too long for a tag"],
    });

    group.bench_function("valid_payload", |b| {
        b.iter(|| engine.validate(black_box(&valid), &rules).unwrap())
    });

    group.bench_function("invalid_payload", |b| {
        b.iter(|| engine.validate(black_box(&invalid), &rules).unwrap())
    });

    let many: RuleSet = (0..50)
        .map(|i| (format!("f{i}"), RuleSpec::builder().mandatory().build().unwrap()))
        .collect();
    group.bench_function("capped_50_failures", |b| {
        b.iter(|| engine.validate(black_box(&json!({})), &many).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_coercion, bench_rendering, bench_engine);
criterion_main!(benches);
