use proptest::prelude::*;
use sqltpl::{Arg, MysqlEscaper, StringEscaper, TemplateCompiler, args, unescape_mysql};

fn raw() -> TemplateCompiler {
    TemplateCompiler::builder().without_syntax_check().build()
}

proptest! {
    #[test]
    fn templates_without_markers_are_unchanged(template in "[^?{}]{0,200}") {
        prop_assert_eq!(raw().build_query(&template, &[]).unwrap(), template);
    }

    #[test]
    fn escape_round_trips(s in any::<String>()) {
        prop_assert_eq!(unescape_mysql(&MysqlEscaper.escape(&s)), s);
    }

    #[test]
    fn escaped_literal_never_closes_early(s in any::<String>()) {
        let escaped = MysqlEscaper.escape(&s);
        // Every quote in the output is preceded by a backslash that is not
        // itself escaped.
        let mut backslashes = 0usize;
        for c in escaped.chars() {
            match c {
                '\\' => backslashes += 1,
                '\'' => {
                    prop_assert!(backslashes % 2 == 1);
                    backslashes = 0;
                }
                _ => backslashes = 0,
            }
        }
    }

    #[test]
    fn string_placeholder_is_one_literal(s in "[^?]{0,64}") {
        let sql = raw()
            .build_query("SELECT * FROM t WHERE a = ?", &args![s.clone()])
            .unwrap();
        let body = sql
            .strip_prefix("SELECT * FROM t WHERE a = '")
            .and_then(|rest| rest.strip_suffix('\''))
            .unwrap();
        prop_assert_eq!(unescape_mysql(body), s);
        prop_assert!(!sql.contains('?'));
    }

    #[test]
    fn int_placeholder_renders_decimal(n in any::<i64>()) {
        prop_assert_eq!(
            raw().build_query("SELECT * FROM t WHERE a = ?d", &args![n]).unwrap(),
            format!("SELECT * FROM t WHERE a = {n}")
        );
    }

    #[test]
    fn valid_identifiers_are_quoted(name in "[A-Za-z0-9_]{1,32}") {
        prop_assert_eq!(
            raw().build_query("SELECT ?# FROM t", &[Arg::from(name.as_str())]).unwrap(),
            format!("SELECT `{name}` FROM t")
        );
    }

    #[test]
    fn identifiers_with_other_characters_fail(
        name in "[A-Za-z0-9_]{0,8}[^A-Za-z0-9_][A-Za-z0-9_]{0,8}"
    ) {
        prop_assert!(raw().build_query("SELECT ?# FROM t", &args![name]).is_err());
    }
}
