//! CLDR plural category resolution.
//!
//! Numeric selectors fall back to their cardinal plural category when no
//! variant key matches them exactly. Categories depend on the locale:
//! English distinguishes "one" and "other", Russian adds "few" and "many",
//! Arabic uses all six.
//!
//! Rules are cached per thread per locale so repeated format calls do not
//! rebuild `PluralRules`. Operands are derived from the literal text of the
//! number, not its numeric value, because visible fraction digits change the
//! category in many locales (`1.0` is "other" in English while `1` is "one").

use std::cell::RefCell;

use fixed_decimal::Decimal;
use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};

use crate::types::Number;

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by locale string.
    static PLURAL_RULES_CACHE: RefCell<Vec<(String, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Build `PluralRules` for a locale string, falling back to root rules when
/// the locale does not parse or carries no plural data.
fn build_rules(locale: &str) -> PluralRules {
    let parsed = Locale::try_from_str(locale).unwrap_or(Locale::UNKNOWN);
    PluralRules::try_new(parsed.into(), PluralRuleType::Cardinal.into()).unwrap_or_else(|_| {
        PluralRules::try_new(Locale::UNKNOWN.into(), PluralRuleType::Cardinal.into())
            .expect("root locale plural rules are compiled in")
    })
}

fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

fn operands(number: &Number) -> PluralOperands {
    match number.raw().parse::<Decimal>() {
        Ok(decimal) => PluralOperands::from(&decimal),
        Err(_) => PluralOperands::from(number.as_i64().unwrap_or(0).unsigned_abs()),
    }
}

/// Cardinal plural category of `number` in `locale`.
///
/// Returns one of "zero", "one", "two", "few", "many", "other".
pub fn plural_category(locale: &str, number: &Number) -> &'static str {
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, rules)) = cache.iter().find(|(code, _)| code == locale) {
            return category_str(rules.category_for(operands(number)));
        }
        let rules = build_rules(locale);
        let category = category_str(rules.category_for(operands(number)));
        cache.push((locale.to_string(), rules));
        category
    })
}
