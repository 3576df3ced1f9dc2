#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on correctness of specific syntactic forms, on statement segmentation, and on the
/// parser's error containment (one malformed construct must not swallow its neighbours).
mod tests {
    use super::*;
    use crate::classify::lexemes;
    use std::rc::Rc;

    fn parse_str(source: &str) -> Vec<Node> {
        parse_source(source)
    }

    /// Parse a single statement and render it as an S-expression.
    fn sexp(source: &str) -> String {
        let program = parse_str(source);
        assert_eq!(program.len(), 1, "expected one statement for {source:?}, got {program:?}");
        program[0].to_string()
    }

    fn error_message(node: &Node) -> &str {
        match node {
            Node::Error(e) => &e.message,
            other => panic!("Expected error node, got {other}"),
        }
    }

    // ========================================================================
    // Concrete scenarios
    // ========================================================================

    #[test]
    fn test_declaration_with_initializer() {
        let program = parse_str("my $x = 10;");
        assert_eq!(program.len(), 1);
        match &program[0] {
            Node::Declaration {
                declarator,
                variables,
                initializer,
                parenthesized,
            } => {
                assert_eq!(declarator, "my");
                assert_eq!(variables, &vec![Node::variable('$', "x")]);
                assert_eq!(initializer.as_deref(), Some(&Node::number("10")));
                assert!(!parenthesized);
            }
            other => panic!("Expected declaration, got {other}"),
        }
    }

    #[test]
    fn test_fat_comma_autoquotes_bareword() {
        assert_eq!(sexp("foo => 1"), "(List (String \"foo\") (Number 1))");
        assert_eq!(
            sexp("my $h = { foo => 1 };"),
            "(Declaration my (Variable $h) :initializer (HashLiteral (Pair (String \"foo\") (Number 1))))"
        );
    }

    #[test]
    fn test_if_elsif_else_is_one_statement() {
        let source = "if ($x > 5) { return 1; } elsif ($x > 0) { return 2; } else { return 3; }";
        let program = parse_str(source);
        assert_eq!(program.len(), 1);
        match &program[0] {
            Node::If {
                elsif_clauses,
                else_block,
                postfix,
                ..
            } => {
                assert_eq!(elsif_clauses.len(), 1);
                assert_eq!(else_block.as_ref().map(Vec::len), Some(1));
                assert!(!postfix);
            }
            other => panic!("Expected if, got {other}"),
        }
        assert_eq!(
            program[0].to_string(),
            "(If (BinaryOp > (Variable $x) (Number 5)) (block (Return (Number 1))) \
             (elsif (BinaryOp > (Variable $x) (Number 0)) (block (Return (Number 2)))) \
             :else (block (Return (Number 3))))"
        );
    }

    #[test]
    fn test_missing_assignment_value_is_contained() {
        let program = parse_str("$x = ;\nprint \"ok\";");
        assert_eq!(program.len(), 2);
        match &program[0] {
            Node::Assignment { target, value, .. } => {
                assert_eq!(**target, Node::variable('$', "x"));
                assert_eq!(error_message(value), "Empty expression after '='");
            }
            other => panic!("Expected assignment, got {other}"),
        }
        assert!(matches!(program[1], Node::Print { .. }));
    }

    #[test]
    fn test_unterminated_string_becomes_error_node() {
        let program = parse_str("print 1;\n  \"unterminated");
        assert_eq!(program.len(), 2);
        let Node::Error(error) = &program[1] else {
            panic!("Expected error node, got {}", program[1]);
        };
        assert_eq!(error.message, "Unterminated string literal");
        assert_eq!((error.line, error.column), (2, 3));
    }

    // ========================================================================
    // Precedence
    // ========================================================================

    #[test]
    fn test_precedence_cases() {
        assert_eq!(sexp("1 + 2 * 3"), "(BinaryOp + (Number 1) (BinaryOp * (Number 2) (Number 3)))");
        assert_eq!(sexp("2 ** 3 ** 2"), "(BinaryOp ** (Number 2) (BinaryOp ** (Number 3) (Number 2)))");
        assert_eq!(
            sexp("$a = $b = 5"),
            "(Assignment (Variable $a) = (Assignment (Variable $b) = (Number 5)))"
        );
        assert_eq!(
            sexp("1 ? 2 : 3 ? 4 : 5"),
            "(Ternary (Number 1) (Number 2) (Ternary (Number 3) (Number 4) (Number 5)))"
        );
    }

    #[test]
    fn test_left_associative_chain() {
        assert_eq!(sexp("10 - 4 - 3"), "(BinaryOp - (BinaryOp - (Number 10) (Number 4)) (Number 3))");
    }

    #[test]
    fn test_unary_binds_looser_than_power() {
        assert_eq!(sexp("-2 ** 2"), "(UnaryOp - (BinaryOp ** (Number 2) (Number 2)))");
        assert_eq!(
            sexp("!$x && $y"),
            "(BinaryOp && (UnaryOp ! (Variable $x)) (Variable $y))"
        );
    }

    #[test]
    fn test_low_precedence_word_operators() {
        assert_eq!(
            sexp("open(my $fh, \"<\", $f) or die \"no\""),
            "(BinaryOp or (Call (Identifier open) (Declaration my (Variable $fh)) (String \"<\" :interpolated) \
             (Variable $f) :parenthesized) (Die (String \"no\" :interpolated)))"
        );
        assert_eq!(
            sexp("not $a and $b"),
            "(BinaryOp and (UnaryOp not (Variable $a)) (Variable $b))"
        );
    }

    #[test]
    fn test_ternary_nested_in_then_branch() {
        assert_eq!(
            sexp("$a ? $b ? 1 : 2 : 3"),
            "(Ternary (Variable $a) (Ternary (Variable $b) (Number 1) (Number 2)) (Number 3))"
        );
    }

    #[test]
    fn test_ternary_under_postfix_if() {
        assert_eq!(
            sexp("$x ? 1 : 2 if $y;"),
            "(If (Variable $y) (block (Ternary (Variable $x) (Number 1) (Number 2))) :postfix)"
        );
    }

    #[test]
    fn test_named_unary_binds_tighter_than_comparison() {
        assert_eq!(
            sexp("ref $x eq 'HASH'"),
            "(BinaryOp eq (Call (Identifier ref) (Variable $x)) (String \"HASH\"))"
        );
    }

    // ========================================================================
    // Primaries and postfix chains
    // ========================================================================

    #[test]
    fn test_method_chain_and_subscripts() {
        assert_eq!(
            sexp("$obj->method(1)->{key}[0]"),
            "(ArrayAccess (HashAccess (MethodCall (Variable $obj) method (Number 1) :parenthesized) \
             (String \"key\") :arrow) (Number 0))"
        );
        assert_eq!(
            sexp("Foo::Bar->new(x => 1)"),
            "(MethodCall (Identifier Foo::Bar) new (String \"x\") (Number 1) :parenthesized)"
        );
    }

    #[test]
    fn test_postfix_dereference() {
        assert_eq!(sexp("$ref->@*"), "(PostfixDeref (Variable $ref) @)");
        assert_eq!(
            sexp("$ref->@[0, 1]"),
            "(PostfixDerefSlice (Variable $ref) @ array (Number 0) (Number 1))"
        );
        assert_eq!(
            sexp("$ref->%{a}"),
            "(PostfixDerefSlice (Variable $ref) % hash (String \"a\"))"
        );
    }

    #[test]
    fn test_slices_and_element_access() {
        assert_eq!(sexp("@list[1, 2]"), "(ArraySlice (Variable @list) (Number 1) (Number 2))");
        assert_eq!(
            sexp("@h{'a', 'b'}"),
            "(HashSlice (Variable @h) (String \"a\") (String \"b\"))"
        );
        assert_eq!(sexp("$h{key}"), "(HashAccess (Variable $h) (String \"key\"))");
        assert_eq!(sexp("$a[0]"), "(ArrayAccess (Variable $a) (Number 0))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(sexp("qw(a b)"), "(List (String \"a\") (String \"b\"))");
        assert_eq!(sexp("[1, [2, 3]]"), "(ArrayLiteral (Number 1) (ArrayLiteral (Number 2) (Number 3)))");
        assert_eq!(sexp("true"), "(Boolean true)");
        assert_eq!(
            sexp("$s =~ /ab+c/i"),
            "(BinaryOp =~ (Variable $s) (RegexLiteral \"ab+c\" :flags i))"
        );
        assert_eq!(sexp("()"), "(List)");
    }

    #[test]
    fn test_block_taking_builtin() {
        assert_eq!(
            sexp("my @d = map { $_ * 2 } @list;"),
            "(Declaration my (Variable @d) :initializer (Call (Identifier map) \
             (Block (BinaryOp * (Variable $_) (Number 2))) (Variable @list)))"
        );
    }

    #[test]
    fn test_list_operator_swallows_rest_of_list() {
        assert_eq!(
            sexp("push @a, join ',', @b;"),
            "(Call (Identifier push) (Variable @a) (Call (Identifier join) (String \",\") (Variable @b)))"
        );
    }

    #[test]
    fn test_anonymous_sub_and_do_block() {
        assert_eq!(
            sexp("my $f = sub ($n) { return $n; };"),
            "(Declaration my (Variable $f) :initializer (Sub (block (Return (Variable $n))) \
             :params ((Parameter $n))))"
        );
        assert_eq!(sexp("my $v = do { 1 };"), "(Declaration my (Variable $v) :initializer (DoBlock (Number 1)))");
    }

    #[test]
    fn test_prefix_and_postfix_increment() {
        assert_eq!(sexp("++$i"), "(PrefixOp ++ (Variable $i))");
        assert_eq!(sexp("$i--"), "(PostfixOp -- (Variable $i))");
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_print_with_filehandle() {
        assert_eq!(sexp("print STDERR \"oops\";"), "(Print (String \"oops\" :interpolated) :filehandle (Identifier STDERR))");
        assert_eq!(sexp("say $fh 'x';"), "(Say (String \"x\") :filehandle (Variable $fh))");
        assert_eq!(sexp("print $x;"), "(Print (Variable $x))");
    }

    #[test]
    fn test_print_with_parens_is_a_call() {
        assert_eq!(sexp("print(1, 2);"), "(Call (Identifier print) (Number 1) (Number 2) :parenthesized)");
    }

    #[test]
    fn test_postfix_modifiers() {
        assert_eq!(sexp("return unless $x;"), "(Unless (Variable $x) (block (Return)) :postfix)");
        assert_eq!(
            sexp("say for @list;"),
            "(Foreach (Variable @list) (block (Say)) :postfix)"
        );
        assert_eq!(
            sexp("$i++ while $i < 3;"),
            "(While (BinaryOp < (Variable $i) (Number 3)) (block (PostfixOp ++ (Variable $i))) :postfix)"
        );
    }

    #[test]
    fn test_postfix_modifier_rejects_declarations() {
        let program = parse_str("use strict if $x;");
        assert_eq!(error_message(&program[0]), "Invalid target for postfix 'if': Use");
    }

    #[test]
    fn test_foreach_forms() {
        assert_eq!(
            sexp("foreach my $item (@list) { print $item; }"),
            "(Foreach (Variable @list) (block (Print (Variable $item))) :declarator my :variable (Variable $item))"
        );
        assert_eq!(sexp("for (1, 2) { }"), "(Foreach (List (Number 1) (Number 2)) (block))");
    }

    #[test]
    fn test_c_style_for() {
        assert_eq!(
            sexp("for (my $i = 0; $i < 10; $i++) { print $i; }"),
            "(For (block (Print (Variable $i))) :init (Declaration my (Variable $i) :initializer (Number 0)) \
             :condition (BinaryOp < (Variable $i) (Number 10)) :step (PostfixOp ++ (Variable $i)))"
        );
    }

    #[test]
    fn test_foreach_requires_scalar_iterator() {
        let program = parse_str("foreach my @x (@l) { }");
        assert!(error_message(&program[0]).starts_with("foreach without a scalar iterator"));
    }

    #[test]
    fn test_labeled_loop() {
        assert_eq!(
            sexp("OUTER: while ($x) { next OUTER; }"),
            "(While (Variable $x) (block (Next OUTER)) :label OUTER)"
        );
    }

    #[test]
    fn test_empty_while_condition_is_an_error() {
        let program = parse_str("while () { }");
        let Node::While { condition, .. } = &program[0] else {
            panic!("Expected while, got {}", program[0]);
        };
        assert_eq!(error_message(condition), "Empty expression in 'while' condition");
    }

    #[test]
    fn test_loop_continue_blocks() {
        assert_eq!(
            sexp("while ($x) { 1 } continue { 2 }"),
            "(While (Variable $x) (block (Number 1)) :continue (block (Number 2)))"
        );
        assert_eq!(
            sexp("LINE: foreach my $i (@l) { } continue { $n++ }"),
            "(Foreach (Variable @l) (block) :continue (block (PostfixOp ++ (Variable $n))) :label LINE \
             :declarator my :variable (Variable $i))"
        );
    }

    #[test]
    fn test_continue_block_does_not_swallow_next_statement() {
        let program = parse_str("while ($x) { 1 } continue { 2 } print 3;");
        assert_eq!(program.len(), 2);
        let Node::While { continue_block, .. } = &program[0] else {
            panic!("Expected while, got {}", program[0]);
        };
        assert_eq!(continue_block.as_deref(), Some(&[Node::number("2")][..]));
        assert!(matches!(program[1], Node::Print { .. }));
    }

    #[test]
    fn test_c_style_for_rejects_continue_block() {
        let program = parse_str("until ($x) { } continue { } for (;;) { } continue { } say 1;");
        assert_eq!(program.len(), 3);
        assert!(matches!(program[0], Node::Until { continue_block: Some(_), .. }));
        assert_eq!(error_message(&program[1]), "Unexpected 'continue' after 'for' loop");
        assert!(matches!(program[2], Node::Say { .. }));
    }

    #[test]
    fn test_unless_else() {
        assert_eq!(
            sexp("unless ($ok) { warn 'bad'; } else { say 'good'; }"),
            "(Unless (Variable $ok) (block (Warn (String \"bad\"))) :else (block (Say (String \"good\"))))"
        );
    }

    #[test]
    fn test_try_catch_finally() {
        assert_eq!(
            sexp("try { die \"x\"; } catch ($e) { warn $e; } finally { cleanup(); }"),
            "(Try (block (Die (String \"x\" :interpolated))) (catch (block (Warn (Variable $e))) :variable (Variable $e)) \
             :finally (block (Call (Identifier cleanup) :parenthesized)))"
        );
    }

    #[test]
    fn test_given_when_default() {
        assert_eq!(
            sexp("given ($x) { } when (1) { say 'one'; } when (2) { } default { say 'other'; }"),
            "(Given (Variable $x) (block) (When (Number 1) (block (Say (String \"one\")))) (When (Number 2) (block)) \
             :default (block (Say (String \"other\"))))"
        );
    }

    #[test]
    fn test_defer_block() {
        assert_eq!(sexp("defer { close($fh); }"), "(Defer (block (Call (Identifier close) (Variable $fh) :parenthesized)))");
    }

    #[test]
    fn test_named_sub_with_signature() {
        assert_eq!(
            sexp("sub add($a, $b = 2) { return $a + $b; }"),
            "(Sub (block (Return (BinaryOp + (Variable $a) (Variable $b)))) :name add \
             :params ((Parameter $a) (Parameter $b :default (Number 2))))"
        );
        assert_eq!(sexp("my sub tick { }"), "(Sub (block) :name tick :declarator my)");
        assert_eq!(sexp("async sub tick { }"), "(Sub (block) :name tick :async)");
    }

    #[test]
    fn test_sub_without_body() {
        let program = parse_str("sub foo;");
        assert_eq!(error_message(&program[0]), "Incomplete sub declaration: missing body");
    }

    #[test]
    fn test_class_with_fields_and_methods() {
        let source = "class Point :isa(Shape) { field $x :param = 0; method norm { return $x; } }";
        assert_eq!(
            sexp(source),
            "(Class Point :parent Shape :body (block (Field (Variable $x) :attr (param) :default (Number 0)) \
             (Method (block (Return (Variable $x))) :name norm)))"
        );
    }

    #[test]
    fn test_class_without_name() {
        let program = parse_str("class { }");
        assert_eq!(error_message(&program[0]), "Incomplete class declaration: missing class name");
    }

    #[test]
    fn test_use_forms() {
        assert_eq!(sexp("use strict;"), "(Use :module strict)");
        assert_eq!(sexp("use v5.40;"), "(Use :version v5.40)");
        assert_eq!(sexp("use 5.040;"), "(Use :version 5.040)");
        assert_eq!(
            sexp("use List::Util qw(max min);"),
            "(Use :module List::Util :imports (List (String \"max\") (String \"min\")))"
        );
        let program = parse_str("use;");
        assert_eq!(error_message(&program[0]), "use statement with empty module name");
    }

    #[test]
    fn test_package_and_require() {
        assert_eq!(sexp("package Foo::Bar;"), "(Package Foo::Bar)");
        assert_eq!(sexp("package Foo 1.2 { }"), "(Package Foo :version 1.2 :block (block))");
        assert_eq!(sexp("require Foo::Bar;"), "(Require (Identifier Foo::Bar))");
    }

    #[test]
    fn test_declaration_lists() {
        assert_eq!(
            sexp("my ($a, $b) = @_;"),
            "(Declaration my (Variable $a) (Variable $b) :initializer (Variable @_) :parenthesized)"
        );
        let program = parse_str("my = 5;");
        assert_eq!(error_message(&program[0]), "Incomplete my declaration: missing variable name");
    }

    #[test]
    fn test_jumps() {
        assert_eq!(sexp("last;"), "(Last)");
        assert_eq!(sexp("redo LINE;"), "(Redo LINE)");
        assert_eq!(sexp("break;"), "(Break)");
        assert_eq!(sexp("throw $e;"), "(Throw (Variable $e))");
        assert_eq!(sexp("return (1, 2);"), "(Return (List (Number 1) (Number 2)))");
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_missing_operand() {
        let program = parse_str("1 +");
        let Node::BinaryOp { right, .. } = &program[0] else {
            panic!("Expected binary op, got {}", program[0]);
        };
        assert_eq!(error_message(right), "Missing right operand after '+'");
    }

    #[test]
    fn test_missing_ternary_colon() {
        let program = parse_str("$x ? 1;");
        let Node::Ternary { else_expr, .. } = &program[0] else {
            panic!("Expected ternary, got {}", program[0]);
        };
        assert_eq!(error_message(else_expr), "Expected ':' in ternary, found end of statement");
    }

    #[test]
    fn test_missing_paren_after_if() {
        let program = parse_str("if $x { }");
        assert_eq!(error_message(&program[0]), "Expected '(' after 'if', found '$x { }'");
    }

    #[test]
    fn test_error_factory_context_width_is_injectable() {
        let errors = ErrorFactory::new(ErrorConfig { context_width: 1 });
        let program: Vec<Node> = parse(lexemes("if $x { }")).with_errors(errors).collect();
        assert_eq!(error_message(&program[0]), "Expected '(' after 'if', found '$x ...'");
    }

    #[test]
    fn test_unterminated_block() {
        let program = parse_str("sub foo { return 1;");
        assert_eq!(error_message(&program[0]), "Unterminated block");
    }

    #[test]
    fn test_unclosed_call_does_not_swallow_next_statement() {
        let program = parse_str("foo(1, 2; bar();");
        assert_eq!(program.len(), 2);
        assert_eq!(error_message(&program[0]), "Missing closing ')' for '('");
        assert_eq!(program[1].to_string(), "(Call (Identifier bar) :parenthesized)");
    }

    #[test]
    fn test_stray_closing_brace_is_its_own_statement() {
        let program = parse_str("print 1; } print 2;");
        assert_eq!(program.len(), 3);
        assert_eq!(error_message(&program[1]), "Unexpected '}' in expression");
        assert!(matches!(program[2], Node::Print { .. }));
    }

    #[test]
    fn test_orphan_else() {
        let program = parse_str("else { }");
        assert_eq!(error_message(&program[0]), "Unexpected 'else' without a preceding block statement");
    }

    #[test]
    fn test_error_nested_inside_list_keeps_tree_complete() {
        let program = parse_str("my @a = (1, $, 3);");
        assert_eq!(program.len(), 1);
        assert!(has_error_node(&program));
        let errors = find_error_nodes(&program);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected variable name after '$'");
    }

    #[test]
    fn test_empty_statement_buffer() {
        let node = parse_statement(&[]);
        let Node::Error(error) = node else {
            panic!("Expected error node");
        };
        assert_eq!(error.message, "Empty statement");
        assert_eq!((error.line, error.column), (0, 0));
    }

    #[test]
    fn test_leftover_lexemes_are_a_parse_failure() {
        let program = parse_str("$a $b $c $d $e; print 1;");
        assert_eq!(program.len(), 2);
        let Node::Error(error) = &program[0] else {
            panic!("Expected error node, got {}", program[0]);
        };
        assert_eq!(error.message, "Could not parse expression: '$b $c $d ...'");
        assert_eq!(error.text, "$b");
        assert_eq!((error.line, error.column), (1, 4));
    }

    #[test]
    fn test_block_dereference_is_reported_and_contained() {
        let program = parse_str("@{$r}; print 1;");
        assert_eq!(program.len(), 2);
        assert_eq!(error_message(&program[0]), "Could not parse expression: '{ $r }'");
        assert!(matches!(program[1], Node::Print { .. }));
    }

    #[test]
    fn test_parse_failure_message_shape() {
        let errors = ErrorFactory::new(ErrorConfig { context_width: 2 });
        let lx = lexemes("x y z");
        let Node::Error(error) = errors.parse_failure("list", &lx, &lx[0]) else {
            panic!("Expected error node");
        };
        assert_eq!(error.message, "Could not parse list: 'x y ...'");
        let Node::Error(error) = errors.parse_failure("list", &[], &lx[2]) else {
            panic!("Expected error node");
        };
        assert_eq!(error.message, "Could not parse list: end of statement");
        assert_eq!(error.text, "z");
    }

    // ========================================================================
    // Nesting depth
    // ========================================================================

    fn nesting_error() -> String {
        format!("Nesting deeper than {MAX_NESTING_DEPTH} levels")
    }

    #[test]
    fn test_deeply_nested_parens_are_cut_off() {
        let depth = 10_000;
        let source = format!("$x = {}1{}; print 2;", "(".repeat(depth), ")".repeat(depth));
        let program = parse_str(&source);
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Node::Assignment { .. }));
        let errors = find_error_nodes(&program[..1]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, nesting_error());
        assert!(matches!(program[1], Node::Print { .. }));
    }

    #[test]
    fn test_deeply_nested_blocks_are_cut_off() {
        let depth = 10_000;
        let source = format!("{}1;{} print 2;", "if ($x) { ".repeat(depth), "}".repeat(depth));
        let program = parse_str(&source);
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Node::If { .. }));
        // The innermost reachable `if` loses both its condition and its block.
        let errors = find_error_nodes(&program[..1]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message == nesting_error()));
        assert!(matches!(program[1], Node::Print { .. }));
    }

    #[test]
    fn test_deeply_nested_bare_blocks_are_cut_off() {
        let depth = 10_000;
        let source = format!("{}{} say 1;", "{ ".repeat(depth), "} ".repeat(depth));
        let program = parse_str(&source);
        assert_eq!(program.len(), 2);
        assert_eq!(find_error_nodes(&program[..1]).len(), 1);
        assert!(matches!(program[1], Node::Say { .. }));
    }

    #[test]
    fn test_long_prefix_operator_chains_are_cut_off() {
        for source in [
            format!("{}$x;", "- ".repeat(10_000)),
            format!("{}$x;", "not ".repeat(10_000)),
            format!("{}$x;", "++".repeat(10_000)),
            format!("$y = {}$x;", "defined ".repeat(10_000)),
        ] {
            let program = parse_str(&source);
            assert_eq!(program.len(), 1);
            let errors = find_error_nodes(&program);
            assert_eq!(errors.len(), 1, "{errors:?}");
            assert_eq!(errors[0].message, nesting_error());
        }
    }

    #[test]
    fn test_nesting_below_the_limit_is_parsed() {
        let depth = MAX_NESTING_DEPTH / 2;
        let source = format!("$x = {}1{};", "[".repeat(depth), "]".repeat(depth));
        assert!(!has_error_node(&parse_str(&source)));
    }

    #[test]
    fn test_long_low_precedence_chains_are_left_associative() {
        assert_eq!(
            sexp("$a or $b xor $c or $d"),
            "(BinaryOp or (BinaryOp xor (BinaryOp or (Variable $a) (Variable $b)) (Variable $c)) (Variable $d))"
        );
        assert_eq!(
            sexp("$a and and $b"),
            "(BinaryOp and (BinaryOp and (Variable $a) (Error \"Missing right operand after 'and'\" :at 1:4)) \
             (Variable $b))"
        );
        let program = parse_str("or $a");
        let Node::BinaryOp { left, .. } = &program[0] else {
            panic!("Expected binary op, got {}", program[0]);
        };
        assert_eq!(error_message(left), "Empty expression before 'or'");
    }

    // ========================================================================
    // Segmentation and streaming
    // ========================================================================

    #[test]
    fn test_self_terminating_blocks_need_no_semicolon() {
        let program = parse_str("sub a { } sub b { } { my $x; } print 1");
        assert_eq!(program.len(), 4);
        assert!(matches!(program[2], Node::Block { .. }));
    }

    #[test]
    fn test_pending_if_is_emitted_before_next_statement() {
        let program = parse_str("if ($x) { 1 } print 2;");
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Node::If { .. }));
    }

    #[test]
    fn test_repeated_catch_stays_in_one_statement() {
        let program = parse_str("try { } catch ($a) { } catch ($b) { } finally { } say 1;");
        assert_eq!(program.len(), 2);
        let Node::Try { catches, finally, .. } = &program[0] else {
            panic!("Expected try, got {}", program[0]);
        };
        assert_eq!(catches.len(), 2);
        assert!(finally.is_some());
    }

    #[test]
    fn test_braces_inside_statement_do_not_split_it() {
        let program = parse_str("my %h = (a => { b => [1, 2] }); print 1;");
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_lone_semicolons_are_ignored() {
        assert_eq!(parse_str(";; print 1;;").len(), 1);
    }

    #[test]
    fn test_statements_stream_before_input_is_exhausted() {
        let pulled = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&pulled);
        let chunks = ["print 1;\n", "print 2;\n", "print 3;\n", "print 4;\n"]
            .into_iter()
            .inspect(move |_| counter.set(counter.get() + 1));
        let mut parser = parse_chunks(chunks);

        let first = parser.next().expect("first statement");
        assert!(matches!(first, Node::Print { .. }));
        assert!(pulled.get() <= 2, "read {} chunks for the first statement", pulled.get());
        assert_eq!(parser.count(), 3);
    }

    #[test]
    fn test_chunk_boundaries_are_invisible() {
        let whole = parse_str("my $total = 10 + 20;");
        let split: Vec<Node> = parse_chunks(["my $to", "tal = 1", "0 + 2", "0;"]).collect();
        assert_eq!(whole, split);
    }

    // ========================================================================
    // Utilities and recovery helpers
    // ========================================================================

    #[test]
    fn test_split_top_level_commas_is_depth_aware() {
        let lx = lexemes("f(1, [2,3], {4=>5}), 6");
        let segments = split_top_level_commas(&lx);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].len(), 1);
    }

    #[test]
    fn test_find_matching_mixed_delimiters() {
        let lx = lexemes("( [ { } ] ) x");
        assert_eq!(find_matching(&lx, 0), Some(5));
        assert_eq!(find_matching(&lx, 1), Some(4));
        assert_eq!(find_matching(&lx, 6), None);
        let mismatched = lexemes("( ]");
        assert_eq!(find_matching(&mismatched, 0), None);
    }

    #[test]
    fn test_find_ternary_colon_skips_nested_pairs() {
        // Branch after the first `?` of `1 ? 2 ? 3 : 4 : 5`.
        let lx = lexemes("2 ? 3 : 4 : 5");
        assert_eq!(find_ternary_colon(&lx), Some(5));
        let lx = lexemes("f(a ? b : c) : d");
        assert_eq!(find_ternary_colon(&lx), Some(8));
    }

    #[test]
    fn test_recovery_positions() {
        let lx = lexemes("a(1; 2); b; { c; } d");
        assert_eq!(skip_to_terminator(&lx, 0), 6);
        assert_eq!(skip_to_comma(&lx, 0), lx.len());
        // After `a(1; 2);` the next safe point is just past the terminator.
        assert_eq!(synchronize(&lx, 0), 7);
        // From the block, resume after its closing brace.
        assert_eq!(synchronize(&lx, 9), 13);
    }

    #[test]
    fn test_parse_expression_entry_point() {
        let node = parse_expression(&lexemes("1, 2"));
        assert_eq!(node.to_string(), "(List (Number 1) (Number 2))");
    }
}
