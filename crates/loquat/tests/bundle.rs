//! Bundle configuration and registry tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use loquat::{
    Bundle, BundleError, EntryKind, FluentFunction, FunctionDescriptor, FunctionOutput, Options,
    ResolveError, Value, args,
};

#[test]
fn first_definition_wins_for_duplicate_entries() {
    let mut bundle = Bundle::new();
    bundle
        .add_resource(loquat::parse("hello = First\n-brand = Loquat\n"))
        .unwrap();
    let errors = bundle
        .add_resource(loquat::parse("hello = Second\n-brand = Other\nfresh = New\n"))
        .unwrap_err();
    assert_eq!(
        errors,
        [
            BundleError::Overriding {
                kind: EntryKind::Message,
                id: "hello".to_string(),
            },
            BundleError::Overriding {
                kind: EntryKind::Term,
                id: "brand".to_string(),
            },
        ]
    );
    // The rejected redefinitions changed nothing; the new entry still landed.
    assert_eq!(bundle.format("hello", None), "First");
    assert_eq!(bundle.format("fresh", None), "New");
}

#[test]
fn duplicate_entries_within_one_resource_are_rejected_too() {
    let mut bundle = Bundle::new();
    let errors = bundle
        .add_resource(loquat::parse("a = One\na = Two\n"))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(bundle.format("a", None), "One");
}

#[test]
fn has_message_only_sees_messages() {
    let mut bundle = Bundle::new();
    bundle
        .add_resource(loquat::parse("hello = Hi\n-brand = Loquat\n"))
        .unwrap();
    assert!(bundle.has_message("hello"));
    assert!(!bundle.has_message("brand"));
    assert!(!bundle.has_message("missing"));
}

#[test]
fn junk_entries_are_skipped_when_adding_a_resource() {
    let mut bundle = Bundle::new();
    let resource = loquat::parse("ok = Fine\n!!! junk\n");
    assert_eq!(resource.errors.len(), 1);
    bundle.add_resource(resource).unwrap();
    assert_eq!(bundle.format("ok", None), "Fine");
}

struct Shout;

impl FluentFunction for Shout {
    fn call(
        &self,
        positional: &[Value],
        _options: &Options,
    ) -> Result<FunctionOutput, ResolveError> {
        let rendered: Vec<String> = positional
            .iter()
            .map(|value| value.to_string().to_uppercase())
            .collect();
        Ok(FunctionOutput::Text(rendered.join(" ")))
    }
}

static SHOUT_BUILDS: AtomicUsize = AtomicUsize::new(0);

fn build_shout(
    _locale: &str,
    _options: &Options,
) -> Result<Arc<dyn FluentFunction>, ResolveError> {
    SHOUT_BUILDS.fetch_add(1, Ordering::SeqCst);
    Ok(Arc::new(Shout))
}

#[test]
fn custom_functions_are_called_and_cached() {
    let mut bundle = Bundle::new();
    bundle
        .add_function(
            "SHOUT",
            FunctionDescriptor {
                cacheable: true,
                build: build_shout,
            },
        )
        .unwrap();
    bundle
        .add_resource(loquat::parse("m = { SHOUT($word) }\n"))
        .unwrap();

    let args = args! { "word" => "quiet" };
    assert_eq!(bundle.format("m", Some(&args)), "QUIET");
    assert_eq!(bundle.format("m", Some(&args)), "QUIET");
    // Same name, locale and options: constructed at most once.
    assert_eq!(SHOUT_BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn builtin_function_names_cannot_be_replaced() {
    let mut bundle = Bundle::new();
    let error = bundle
        .add_function(
            "NUMBER",
            FunctionDescriptor {
                cacheable: false,
                build: |_locale, _options| {
                    Err(ResolveError::Function {
                        name: "NUMBER".to_string(),
                        reason: "unused".to_string(),
                    })
                },
            },
        )
        .unwrap_err();
    assert_eq!(
        error,
        BundleError::Overriding {
            kind: EntryKind::Function,
            id: "NUMBER".to_string(),
        }
    );
    // The builtin still works.
    bundle
        .add_resource(loquat::parse("n = { NUMBER($x) }\n"))
        .unwrap();
    assert_eq!(bundle.format("n", Some(&args! { "x" => 7 })), "7");
}

#[test]
fn the_error_listener_receives_the_call_context() {
    let mut bundle = Bundle::builder().locale("de").build();
    bundle
        .add_resource(loquat::parse("login =\n    .tooltip = Klick\n"))
        .unwrap();

    let seen: Arc<Mutex<Vec<(String, Option<String>, String, usize)>>> =
        Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bundle.set_error_listener(move |report| {
        let mut seen = sink.lock().unwrap_or_else(PoisonError::into_inner);
        seen.push((
            report.message_id.to_string(),
            report.attribute.map(ToString::to_string),
            report.locale.to_string(),
            report.errors.len(),
        ));
    });

    // A clean call does not invoke the listener.
    assert_eq!(bundle.format_attribute("login", "tooltip", None), "Klick");
    // A missing attribute fires it once with the full context.
    assert_eq!(bundle.format_attribute("login", "nope", None), "{login.nope}");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        [(
            "login".to_string(),
            Some("nope".to_string()),
            "de".to_string(),
            1,
        )]
    );
}

#[test]
fn missing_top_level_messages_render_a_placeholder() {
    let bundle = Bundle::new();
    assert_eq!(bundle.format("absent", None), "{absent}");
    assert_eq!(
        bundle.format_attribute("absent", "attr", None),
        "{absent.attr}"
    );
}

#[test]
fn empty_args_macro_builds_an_empty_map() {
    let bundle = Bundle::new();
    let args = args! {};
    assert_eq!(bundle.format("missing", Some(&args)), "{missing}");
}
