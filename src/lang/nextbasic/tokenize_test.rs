// Expected bytes follow the layout the Next stores in memory:
// line number (big endian), payload length (little endian), payload ending in 0D.
// Numbers are written as text, then 0E, then the 5 byte form.

#[cfg(test)]
use super::tokenizer::Tokenizer;
#[cfg(test)]
use crate::lang;
#[cfg(test)]
use super::settings::Settings;

#[cfg(test)]
fn test_tokenizer(test_code: &str,expected: &str) {
    let mut tokenizer = Tokenizer::new();
    let bytes = tokenizer.tokenize(test_code).expect("tokenizer failed");
    assert_eq!(hex::encode_upper(bytes),expected);
}

/// check only the payload of a single line of text
#[cfg(test)]
fn test_line(test_code: &str,expected: &str) {
    let tokenizer = Tokenizer::new();
    let bytes = tokenizer.tokenize_line(test_code).expect("tokenizer failed");
    assert_eq!(hex::encode_upper(bytes),expected);
}

mod program_tests {
    #[test]
    fn let_and_print() {
        let test_code = "10 LET a=1.5\n20 PRINT a";
        let expected = "000A0D00F1613D312E350E81400000000D".to_string() + "00140300F5610D";
        super::test_tokenizer(test_code,&expected);
    }
    #[test]
    fn auto_numbering() {
        let test_code = "PRINT 1\n\nCLS\n";
        let expected = "000A0900F5310E00000100000D".to_string() + "00140200FB0D";
        super::test_tokenizer(test_code,&expected);
    }
    #[test]
    fn auto_numbering_follows_last_line() {
        let test_code = "100 CLS\nCLS";
        let expected = "00640200FB0D".to_string() + "006E0200FB0D";
        super::test_tokenizer(test_code,&expected);
    }
    #[test]
    fn directives_are_not_lines() {
        let mut tokenizer = super::Tokenizer::new();
        let bytes = tokenizer.tokenize("#program demo\n#autostart 10\n# note\n10 CLS").expect("tokenizer failed");
        assert_eq!(hex::encode_upper(bytes),"000A0200FB0D");
        assert_eq!(tokenizer.directives().name,Some("demo".to_string()));
        assert_eq!(tokenizer.directives().autostart,Some(10));
    }
    #[test]
    fn duplicate_line_dropped() {
        let mut tokenizer = super::Tokenizer::new();
        let bytes = tokenizer.tokenize("10 CLS\n10 PRINT\n20 CLS").expect("tokenizer failed");
        assert_eq!(hex::encode_upper(bytes),"000A0200FB0D00140200FB0D");
        assert_eq!(tokenizer.diagnostics().len(),1);
        assert!(matches!(tokenizer.diagnostics()[0],super::lang::Error::DuplicateLineNumber(10)));
    }
    #[test]
    fn line_number_too_large() {
        let mut tokenizer = super::Tokenizer::new();
        assert!(tokenizer.tokenize("10000 CLS").is_err());
        assert!(tokenizer.tokenize("9990 CLS\nCLS").is_err());
    }
    #[test]
    fn auto_step_overflow() {
        let mut settings = super::Settings::new();
        settings.tokenizer.auto_step = i64::MAX;
        let mut tokenizer = super::Tokenizer::new();
        tokenizer.set_settings(settings);
        assert!(tokenizer.tokenize("10 CLS\nCLS").is_err());
    }
    #[test]
    fn bad_literal_is_fatal() {
        let mut tokenizer = super::Tokenizer::new();
        assert!(tokenizer.tokenize("10 PRINT 1.2.3").is_err());
    }
}

mod keyword_tests {
    #[test]
    fn go_sub() {
        super::test_line("GO SUB 100","ED3130300E00006400000D");
        super::test_line("gosub 100","ED3130300E00006400000D");
    }
    #[test]
    fn for_to() {
        super::test_line("FOR i=1 TO 10","EB693D310E0000010000CC31300E00000A00000D");
    }
    #[test]
    fn word_boundaries() {
        super::test_line("LET total=1","F1746F74616C3D310E00000100000D");
        super::test_line("LET x1=2","F178313D320E00000200000D");
    }
    #[test]
    fn symbols() {
        super::test_line("IF a<=3 THEN PRINT","FA61C7330E0000030000CBF50D");
        super::test_line("OPEN #4","D3340E00000400000D");
        super::test_line("OPEN#4","D3340E00000400000D");
    }
    #[test]
    fn lower_case() {
        super::test_line("print a","F5610D");
    }
    #[test]
    fn fn_prefix_is_identifier() {
        super::test_line("LET fname=1","F1666E616D653D310E00000100000D");
        super::test_line("PRINT FNf(2)","F5A86628320E000002000029 0D".replace(" ","").as_str());
    }
    #[test]
    fn remount_is_a_command() {
        super::test_line("REMOUNT","990D");
    }
}

mod literal_tests {
    #[test]
    fn negative() {
        super::test_line("LET a=-1","F1613D2D310E00000100000D");
    }
    #[test]
    fn exponent() {
        super::test_line("PRINT 1E3","F5314533 0E8A7A000000 0D".replace(" ","").as_str());
    }
    #[test]
    fn bin() {
        super::test_line("PRINT BIN 1010","F5C431303130 0E00000A0000 0D".replace(" ","").as_str());
    }
    #[test]
    fn def_fn() {
        let expected = "CE6628780E00000000002C790E000000000029 3D782B79 0D".replace(" ","");
        super::test_line("DEF FN f(x,y)=x+y",&expected);
    }
    #[test]
    fn integer_expressions() {
        super::test_line("LET %a=%b+1","F125613D25622B310D");
        super::test_line("PRINT 7 MOD 2","F5370E0000070000 8B32 0D".replace(" ","").as_str());
    }
    #[test]
    fn integer_expression_closing() {
        // a comma or a statement token ends the region
        super::test_line("PRINT %a,1","F525612C310E00000100000D");
        super::test_line("IF %a THEN PRINT 1","FA2561CBF5310E00000100000D");
        // = ends the region opened by %, then @ opens another
        super::test_line("LET %a=@101","F125613D403130310D");
    }
    #[test]
    fn sigil_after_identifier() {
        super::test_line("LET a$=\"x\"","F161243D2278220D");
        super::test_line("PRINT a$;1","F561243B310E00000100000D");
    }
    #[test]
    fn bad_integer_literal() {
        let tokenizer = super::Tokenizer::new();
        assert!(tokenizer.tokenize_line("LET %a=%b+1.2.3").is_err());
    }
}

mod text_tests {
    #[test]
    fn quotes_are_verbatim() {
        super::test_line("PRINT \"go to\"","F522676F20746F220D");
    }
    #[test]
    fn comment_after_colon() {
        super::test_line("PRINT \"A:B\": ; GOTO 20","F522413A42223A3B20474F544F2032300D");
        super::test_line("CLS:REM x:y","FB3AEA783A790D");
    }
    #[test]
    fn semicolon_mid_statement_is_separator() {
        // only a statement boundary starts a comment
        super::test_line("PRINT \"A:B\" ; GOTO 20","F522413A42223BEC32300E00001400000D");
    }
    #[test]
    fn comment_line() {
        super::test_line("REM  GO TO 10","EA20474F20544F2031300D");
    }
    #[test]
    fn glyphs() {
        super::test_line("PRINT \"£©\u{2588}\"","F522607F8F220D");
    }
    #[test]
    fn escapes() {
        super::test_line("PRINT \"`x1b`127\"","F5221B7F220D");
    }
    #[test]
    fn dot_command() {
        super::test_line(".ls -l","2E6C73202D6C0D");
    }
}
