//! Tokenizer Tests
//!
//! The five-state machine: Boolean algebra at the top level, `|…|`
//! references, `:quantity` tails, `{…}` function calls, and argument runs.

use remote_logic::{detokenize, tokenize, Token};

#[test]
fn test_empty_input_is_just_eol() {
    assert_eq!(tokenize(""), vec![Token::Eol]);
}

#[test]
fn test_operators_are_case_insensitive() {
    let tokens = tokenize("|a| and |b| Or |c|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::Ident("a"),
            Token::Pipe,
            Token::And,
            Token::Pipe,
            Token::Ident("b"),
            Token::Pipe,
            Token::Or,
            Token::Pipe,
            Token::Ident("c"),
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_bare_operator_word_at_start_stays_an_identifier() {
    // A run that began at offset 0 and runs to end-of-input is an item
    // name, so worlds can declare items literally called "and".
    assert_eq!(tokenize("and"), vec![Token::Ident("and"), Token::Eol]);
    assert_eq!(tokenize("AND  "), vec![Token::Ident("AND"), Token::Eol]);
    assert_eq!(tokenize("or"), vec![Token::Ident("or"), Token::Eol]);
}

#[test]
fn test_parentheses_at_top_level() {
    let tokens = tokenize("(|a|)");
    assert_eq!(
        tokens,
        vec![
            Token::LeftParen,
            Token::Pipe,
            Token::Ident("a"),
            Token::Pipe,
            Token::RightParen,
            Token::Eol,
        ]
    );
}

#[test]
fn test_category_reference() {
    let tokens = tokenize("|@weapons|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::At,
            Token::Ident("weapons"),
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_at_only_recognised_right_after_the_pipe() {
    // An interior @ is part of the name.
    let tokens = tokenize("|name@home|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::Ident("name@home"),
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_item_names_may_contain_spaces() {
    let tokens = tokenize("|Progressive Sword:2|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::Ident("Progressive Sword"),
            Token::Colon,
            Token::Ident("2"),
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_quantity_whitespace_is_skipped() {
    let tokens = tokenize("|@gems: 5|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::At,
            Token::Ident("gems"),
            Token::Colon,
            Token::Ident("5"),
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_percent_quantity() {
    let tokens = tokenize("|coin:50%|");
    assert_eq!(
        tokens,
        vec![
            Token::Pipe,
            Token::Ident("coin"),
            Token::Colon,
            Token::Ident("50"),
            Token::Percent,
            Token::Pipe,
            Token::Eol,
        ]
    );
}

#[test]
fn test_all_and_half_literals() {
    assert!(tokenize("|@gems:ALL|").contains(&Token::All));
    assert!(tokenize("|@gems:HALF%|").contains(&Token::Half));
    // Only the exact upper-case spelling is the literal.
    assert!(tokenize("|@gems:All|").contains(&Token::Ident("All")));
}

#[test]
fn test_function_call_shape() {
    let tokens = tokenize("{YamlEnabled(hard_mode)}");
    assert_eq!(
        tokens,
        vec![
            Token::LeftCurly,
            Token::Ident("YamlEnabled"),
            Token::LeftParen,
            Token::Ident("hard_mode"),
            Token::RightParen,
            Token::RightCurly,
            Token::Eol,
        ]
    );
}

#[test]
fn test_function_name_whitespace_is_skipped() {
    let tokens = tokenize("{ YamlEnabled (hard_mode) }");
    assert_eq!(tokens[1], Token::Ident("YamlEnabled"));
}

#[test]
fn test_function_arguments_are_raw_and_balanced() {
    let tokens = tokenize("{OptAll((|a| AND |b|) OR |c|)}");
    assert_eq!(tokens[3], Token::Ident("(|a| AND |b|) OR |c|"));
    assert_eq!(tokens[4], Token::RightParen);
    assert_eq!(tokens[5], Token::RightCurly);
}

#[test]
fn test_functions_compose_with_operators() {
    let tokens = tokenize("{YamlEnabled(hard_mode)} AND |boss_key|");
    assert_eq!(tokens[5], Token::RightCurly);
    assert_eq!(tokens[6], Token::And);
    assert_eq!(tokens[8], Token::Ident("boss_key"));
}

#[test]
fn test_detokenize_collapses_only_operator_whitespace() {
    let source = "|a|   AND   |b|";
    assert_eq!(detokenize(&tokenize(source)), "|a| AND |b|");
}

#[test]
fn test_tokenize_detokenize_identity() {
    for source in [
        "|sword|",
        "|@weapons:2|",
        "|coin:50%|",
        "|@gems:ALL|",
        "(|a| AND |b|) OR |c|",
        "{canReachLocation(The Vault)} AND |lockpick|",
        "bare_item",
    ] {
        let tokens = tokenize(source);
        assert_eq!(tokenize(&detokenize(&tokens)), tokens, "source: {source:?}");
    }
}
