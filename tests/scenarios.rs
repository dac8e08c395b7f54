//! End-to-end scenarios: each Mython source is driven through the real
//! lexer, and the syntax tree an external parser would build for it is
//! executed against the evaluator.

use std::rc::Rc;

use anyhow::Result;
use indoc::indoc;

use mython::ast::{BinaryOperator, Comparator, Statement};
use mython::interpreter::Interpreter;
use mython::lexer::tokenize;
use mython::runtime::{Class, Method, ObjectHolder, RuntimeError, StringContext};
use mython::token::Token;

fn number(value: i32) -> Statement {
    Statement::Const(ObjectHolder::number(value))
}

fn string(value: &str) -> Statement {
    Statement::Const(ObjectHolder::string(value))
}

fn variable(name: &str) -> Statement {
    Statement::VariableValue {
        name: name.to_string(),
        fields: Vec::new(),
    }
}

fn print(args: Vec<Statement>) -> Statement {
    Statement::Print { args }
}

fn program(statements: Vec<Statement>) -> Statement {
    Statement::Compound { statements }
}

fn method(name: &str, params: &[&str], body: Statement) -> Method {
    Method {
        name: name.to_string(),
        formal_params: params.iter().map(|param| param.to_string()).collect(),
        body: Rc::new(Statement::MethodBody {
            body: Box::new(body),
        }),
    }
}

fn returning(name: &str, value: i32) -> Method {
    method(
        name,
        &[],
        Statement::Return {
            value: Box::new(number(value)),
        },
    )
}

fn new_instance(class: &Rc<Class>) -> Statement {
    Statement::NewInstance {
        class: Rc::clone(class),
        args: Vec::new(),
    }
}

fn call(object: Statement, name: &str) -> Statement {
    Statement::MethodCall {
        object: Box::new(object),
        method: name.to_string(),
        args: Vec::new(),
    }
}

#[test]
fn hello_world() -> Result<()> {
    let source = "print \"hello\"";
    assert_eq!(
        tokenize(source)?,
        vec![
            Token::Print,
            Token::String("hello".to_string()),
            Token::Newline,
            Token::Eof,
        ]
    );

    let output = Interpreter::new().run(&program(vec![print(vec![string("hello")])]))?;
    assert_eq!(output, "hello\n");
    Ok(())
}

#[test]
fn indentation_and_class() -> Result<()> {
    let source = indoc! {r#"
        class X:
          def hi(self):
            return 42
        x = X()
        print x.hi()
    "#};
    let tokens = tokenize(source)?;
    assert!(tokens.contains(&Token::Class));
    assert_eq!(
        tokens
            .iter()
            .filter(|token| matches!(token, Token::Indent))
            .count(),
        2
    );
    assert_eq!(tokens.last(), Some(&Token::Eof));

    let class = Rc::new(Class::new("X", vec![returning("hi", 42)], None));
    let tree = program(vec![
        Statement::ClassDefinition {
            class: Rc::clone(&class),
        },
        Statement::Assignment {
            name: "x".to_string(),
            value: Box::new(new_instance(&class)),
        },
        print(vec![call(variable("x"), "hi")]),
    ]);
    assert_eq!(Interpreter::new().run(&tree)?, "42\n");
    Ok(())
}

#[test]
fn inheritance_and_dispatch() -> Result<()> {
    let source = indoc! {r#"
        class A:
          def m(self):
            return 1
        class B(A):
          def m(self):
            return 2
        print B().m() A().m()
    "#};
    let tokens = tokenize(source)?;
    let indents = tokens
        .iter()
        .filter(|token| matches!(token, Token::Indent))
        .count();
    let dedents = tokens
        .iter()
        .filter(|token| matches!(token, Token::Dedent))
        .count();
    assert_eq!(indents, dedents);
    assert_eq!(
        tokens
            .iter()
            .filter(|token| matches!(token, Token::Eof))
            .count(),
        1
    );

    let base = Rc::new(Class::new("A", vec![returning("m", 1)], None));
    let derived = Rc::new(Class::new(
        "B",
        vec![returning("m", 2)],
        Some(Rc::clone(&base)),
    ));
    let tree = program(vec![
        Statement::ClassDefinition {
            class: Rc::clone(&base),
        },
        Statement::ClassDefinition {
            class: Rc::clone(&derived),
        },
        print(vec![
            call(new_instance(&derived), "m"),
            call(new_instance(&base), "m"),
        ]),
    ]);
    assert_eq!(Interpreter::new().run(&tree)?, "2 1\n");
    Ok(())
}

#[test]
fn string_concat_and_stringify() -> Result<()> {
    let source = "print \"x=\" + str(5)";
    let tokens = tokenize(source)?;
    assert_eq!(
        tokens,
        vec![
            Token::Print,
            Token::String("x=".to_string()),
            Token::Char('+'),
            Token::Id("str".to_string()),
            Token::Char('('),
            Token::Number(5),
            Token::Char(')'),
            Token::Newline,
            Token::Eof,
        ]
    );

    let tree = program(vec![print(vec![Statement::BinaryOp {
        op: BinaryOperator::Add,
        lhs: Box::new(string("x=")),
        rhs: Box::new(Statement::Stringify {
            arg: Box::new(number(5)),
        }),
    }])]);
    assert_eq!(Interpreter::new().run(&tree)?, "x=5\n");
    Ok(())
}

#[test]
fn comparison_and_if_else() -> Result<()> {
    let source = indoc! {r#"
        if 3 > 2:
          print "a"
        else:
          print "b"
    "#};
    let tokens = tokenize(source)?;
    assert!(tokens.contains(&Token::If));
    assert!(tokens.contains(&Token::Else));
    assert!(tokens.contains(&Token::Char('>')));

    let tree = program(vec![Statement::IfElse {
        condition: Box::new(Statement::Comparison {
            cmp: Comparator::Greater,
            lhs: Box::new(number(3)),
            rhs: Box::new(number(2)),
        }),
        then_body: Box::new(print(vec![string("a")])),
        else_body: Some(Box::new(print(vec![string("b")]))),
    }]);
    assert_eq!(Interpreter::new().run(&tree)?, "a\n");
    Ok(())
}

#[test]
fn division_by_zero_halts_without_output() -> Result<()> {
    let tree = program(vec![print(vec![Statement::BinaryOp {
        op: BinaryOperator::Div,
        lhs: Box::new(number(1)),
        rhs: Box::new(number(0)),
    }])]);

    let mut context = StringContext::new();
    let error = Interpreter::new()
        .run_with_context(&tree, &mut context)
        .expect_err("expected division failure");
    assert_eq!(error, RuntimeError::DivisionByZero);
    assert_eq!(context.output(), "");
    Ok(())
}

#[test]
fn indent_dedent_balance_holds_for_deeply_nested_programs() -> Result<()> {
    let source = indoc! {r#"
        class Outer:
          def a(self):
            if True:
              if True:
                return 1
            return 2
          def b(self):
            return 3
        print "done"
    "#};
    let tokens = tokenize(source)?;
    let indents = tokens
        .iter()
        .filter(|token| matches!(token, Token::Indent))
        .count();
    let dedents = tokens
        .iter()
        .filter(|token| matches!(token, Token::Dedent))
        .count();
    assert_eq!(indents, dedents);
    assert_eq!(tokens.last(), Some(&Token::Eof));
    Ok(())
}
