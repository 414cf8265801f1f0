//! Property-based tests for the argument classifier.
//!
//! Uses `proptest` to verify invariants across many random command lines.

#![allow(clippy::expect_used)]

use proptest::prelude::*;
use stevedore_cli::domain::{Catalog, classify};

use crate::mocks::catalog;

const SERVICES: &[&str] = &["solr", "indexer", "db", "web"];
const APPS: &[&str] = &["search", "full", "ghost", "empty"];

fn is_catalogued(word: &str) -> bool {
    SERVICES.contains(&word) || APPS.contains(&word)
}

/// Words the catalog knows nothing about.
fn unknown_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,7}".prop_filter("must not be catalogued", |w| !is_catalogued(w))
}

fn flag() -> impl Strategy<Value = String> {
    prop_oneof![
        "-[a-zA-Z]".prop_map(String::from),
        "--[a-z][a-z-]{0,10}".prop_map(String::from),
    ]
}

fn known_token() -> impl Strategy<Value = String> {
    prop::sample::select(SERVICES.iter().chain(APPS).copied().collect::<Vec<_>>())
        .prop_map(String::from)
}

fn expand(catalog: &Catalog, token: &str) -> Vec<String> {
    catalog
        .resolve(token)
        .into_iter()
        .map(String::from)
        .collect()
}

proptest! {
    /// Unknown trailing words are collected in reverse and restored on output.
    #[test]
    fn prop_passthrough_is_reverse_encounter_order(
        verb in unknown_word(),
        words in prop::collection::vec(unknown_word(), 1..8),
    ) {
        let mut tokens = vec![verb.clone()];
        tokens.extend(words.iter().cloned());
        let inv = classify(&tokens, &catalog());

        let mut reversed = words.clone();
        reversed.reverse();
        prop_assert_eq!(&inv.passthrough, &reversed);
        prop_assert_eq!(inv.passthrough_in_order().collect::<Vec<_>>(), words.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(inv.prefix, vec![verb]);
        prop_assert!(inv.services.is_empty());
    }

    /// A lone application expands to its known members in declaration order.
    #[test]
    fn prop_alias_expansion_keeps_declaration_order(app in prop::sample::select(APPS.to_vec())) {
        let catalog = catalog();
        let inv = classify(&["up", app], &catalog);
        let expected = expand(&catalog, app);
        if expected.is_empty() {
            prop_assert!(inv.services.is_empty());
            prop_assert_eq!(inv.dropped_aliases, vec![app.to_string()]);
        } else {
            prop_assert_eq!(inv.services, expected);
            prop_assert!(inv.dropped_aliases.is_empty());
        }
    }

    /// Services are known, unique, and cover everything the tokens resolve to.
    #[test]
    fn prop_services_are_known_and_deduplicated(
        tokens in prop::collection::vec(known_token(), 1..10),
    ) {
        let catalog = catalog();
        let mut line = vec!["up".to_string()];
        line.extend(tokens.iter().cloned());
        let inv = classify(&line, &catalog);

        for s in &inv.services {
            prop_assert!(catalog.services.contains(s), "unknown service {}", s);
            prop_assert_eq!(inv.services.iter().filter(|x| *x == s).count(), 1);
        }
        for t in &tokens {
            for s in expand(&catalog, t) {
                prop_assert!(inv.services.contains(&s), "{} lost from {}", s, t);
            }
        }
        prop_assert!(inv.passthrough.is_empty());
    }

    /// Classification is a pure function of its input.
    #[test]
    fn prop_classify_is_deterministic(
        flags in prop::collection::vec(flag(), 0..3),
        rest in prop::collection::vec(prop_oneof![unknown_word(), known_token(), flag()], 0..8),
    ) {
        let mut tokens = flags;
        tokens.extend(rest);
        let catalog = catalog();
        prop_assert_eq!(classify(&tokens, &catalog), classify(&tokens, &catalog));
    }

    /// Without catalogued words, every token lands in exactly one bucket.
    #[test]
    fn prop_uncatalogued_tokens_are_conserved(
        flags in prop::collection::vec(flag(), 0..3),
        rest in prop::collection::vec(prop_oneof![unknown_word(), flag()], 0..8),
    ) {
        let mut tokens = flags;
        tokens.extend(rest);
        let inv = classify(&tokens, &catalog());
        prop_assert_eq!(inv.flags.len() + inv.prefix.len() + inv.passthrough.len(), tokens.len());

        let mut rebuilt = inv.flags.clone();
        rebuilt.extend(inv.prefix.iter().cloned());
        rebuilt.extend(inv.passthrough_in_order().map(String::from));
        prop_assert_eq!(rebuilt, tokens);
    }

    /// The only non-flag token is never classified, whatever it names.
    #[test]
    fn prop_single_token_is_left_in_prefix(
        flags in prop::collection::vec(flag(), 0..3),
        token in prop_oneof![unknown_word(), known_token()],
    ) {
        let mut tokens = flags.clone();
        tokens.push(token.clone());
        let inv = classify(&tokens, &catalog());
        prop_assert_eq!(inv.flags, flags);
        prop_assert_eq!(inv.prefix, vec![token]);
        prop_assert!(inv.services.is_empty());
        prop_assert!(inv.passthrough.is_empty());
        prop_assert!(inv.dropped_aliases.is_empty());
    }

    /// A trailing flag stops classification: nothing is consumed.
    #[test]
    fn prop_trailing_flag_blocks_consumption(
        words in prop::collection::vec(prop_oneof![unknown_word(), known_token()], 1..6),
        last in flag(),
    ) {
        let mut tokens = words;
        tokens.push(last);
        let inv = classify(&tokens, &catalog());
        prop_assert_eq!(inv.prefix, tokens);
        prop_assert!(inv.services.is_empty());
        prop_assert!(inv.passthrough.is_empty());
    }
}

#[test]
fn test_logs_follow_keeps_flag_in_prefix() {
    let inv = classify(&["logs", "-f", "solr"], &catalog());
    assert!(inv.flags.is_empty());
    assert_eq!(inv.prefix, ["logs", "-f"]);
    assert_eq!(inv.services, ["solr"]);
    assert!(inv.passthrough.is_empty());
}

#[test]
fn test_down_volumes_flag_is_untouched() {
    let inv = classify(&["down", "-v"], &catalog());
    assert_eq!(inv.prefix, ["down", "-v"]);
    assert!(inv.flags.is_empty() && inv.services.is_empty() && inv.passthrough.is_empty());
}

#[test]
fn test_head_flag_before_verb() {
    let inv = classify(&["-d", "up", "web"], &catalog());
    assert_eq!(inv.flags, ["-d"]);
    assert_eq!(inv.prefix, ["up"]);
    assert_eq!(inv.services, ["web"]);
}
