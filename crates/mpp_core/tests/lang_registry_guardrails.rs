use std::collections::HashMap;

use mpp_core::lang::keywords;
use mpp_core::lang::operators::{self, OperatorClass};
use mpp_core::lang::punctuation;
use mpp_core::lang::sigils;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(
            operators::from_str(info.spelling),
            Some(info.id),
            "operator spelling not resolvable: {}",
            info.spelling
        );
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!(
                "duplicate operator spelling {:?}: {:?} and {:?}",
                info.spelling, prev, info.id
            );
        }
        assert!(
            (operators::TIGHTEST..=operators::LOOSEST).contains(&info.precedence),
            "precedence out of range for {:?}",
            info.id
        );
    }
}

#[test]
fn word_operators_are_reserved_keywords() {
    for info in operators::OPERATORS.iter().filter(|o| o.is_keyword_spelling) {
        let id = keywords::from_str(info.spelling)
            .unwrap_or_else(|| panic!("word operator {:?} is not reserved", info.spelling));
        assert!(keywords::is_word_operator(id), "{:?} not in the word-operator category", id);
    }
}

#[test]
fn every_tokenizer_operator_has_a_table_entry() {
    // Everything the tokenizer can emit as an OPERATOR token: the greedy multi-char set plus the
    // single-character operator alphabet.
    let singles = ["+", "-", "*", "/", "%", "=", "<", ">", "!", "~", "\\", "?", ":", ".", "&", "|", "^"];
    for spelling in operators::MULTI_CHAR_OPERATORS.iter().copied().chain(singles) {
        let id = operators::from_str(spelling).unwrap_or_else(|| panic!("no table entry for {spelling:?}"));
        if operators::class(id) == OperatorClass::Special {
            assert!(
                matches!(spelling, "->" | "++" | "--"),
                "only the arrow and increment/decrement are handled outside the climber: {spelling:?}"
            );
        }
    }
}

#[test]
fn multi_char_operators_are_longest_first() {
    let lens: Vec<usize> = operators::MULTI_CHAR_OPERATORS.iter().map(|s| s.len()).collect();
    assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    assert!(lens.iter().all(|&l| (2..=3).contains(&l)));
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<char, punctuation::PunctuationId> = HashMap::new();

    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_char(info.canonical), Some(info.id));
        assert_eq!(punctuation::as_char(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate punctuation {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
        // Structural punctuation never doubles as an operator spelling.
        assert_eq!(operators::from_str(&info.canonical.to_string()), None);
    }
}

#[test]
fn sigils_round_trip() {
    for info in sigils::SIGILS {
        assert_eq!(sigils::from_char(info.canonical), Some(info.id));
        assert_eq!(sigils::as_char(info.id), info.canonical);
    }
}
