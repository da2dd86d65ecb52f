//! End-to-end behaviour of the language through the public session API.

mod common;

use common::{displayed, eval, eval_after, int, list};
use rust_minilisp::Value;

// =============================================================================
// ARITHMETIC
// =============================================================================

#[test]
fn sums_and_products_are_grouping_independent() {
    let groupings = [
        "(+ 1 (+ 2 3))",
        "(+ (+ 1 2) 3)",
        "(+ 3 2 1)",
        "(+ (+ 3 1) 2)",
    ];
    for source in groupings.iter() {
        assert_eq!(eval(source).unwrap(), int(6), "{}", source);
    }
    assert_eq!(eval("(* 2 (* 3 4))").unwrap(), eval("(* (* 4 3) 2)").unwrap());
}

#[test]
fn variadic_identities() {
    assert_eq!(eval("(+)").unwrap(), int(0));
    assert_eq!(eval("(*)").unwrap(), int(1));
    assert_eq!(eval("(+ 5)").unwrap(), int(5));
}

#[test]
fn floats_mix_with_integers() {
    assert_eq!(eval("(+ 1 0.5)").unwrap(), Value::Float(1.5));
    assert_eq!(eval("(/ 1.0 4)").unwrap(), Value::Float(0.25));
    assert_eq!(eval("(/ 7 2)").unwrap(), int(3));
}

#[test]
fn comparisons() {
    assert_eq!(eval("(< 1 2)").unwrap(), Value::Bool(true));
    assert_eq!(eval("(> 1 2)").unwrap(), Value::Bool(false));
    assert_eq!(eval("(= 2 2.0)").unwrap(), Value::Bool(true));
    assert_eq!(eval("(= (list 1 2) (cons 1 (list 2)))").unwrap(), Value::Bool(true));
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

#[test]
fn if_true_never_evaluates_the_else_branch() {
    let (result, out) = displayed("(display (if #t 1 (display 99)))");
    assert!(result.is_ok());
    assert_eq!(out, "1\n");
}

#[test]
fn if_false_never_evaluates_the_then_branch() {
    let (result, out) = displayed("(display (if #f (display 99) 2))");
    assert!(result.is_ok());
    assert_eq!(out, "2\n");
}

#[test]
fn empty_list_is_false() {
    assert_eq!(eval("(if null 1 2)").unwrap(), int(2));
    assert_eq!(eval("(if (list 0) 1 2)").unwrap(), int(1));
}

// =============================================================================
// BINDING AND SCOPE
// =============================================================================

#[test]
fn let_bindings_only_see_the_outer_environment() {
    assert_eq!(eval("(let ((x 1)) (let ((y x) (x 2)) y))").unwrap(), int(1));
}

#[test]
fn top_level_definitions_persist() {
    assert_eq!(eval_after("(define x 10)", "x").unwrap(), Some(int(10)));
}

#[test]
fn let_bindings_do_not_leak() {
    assert!(eval_after("(let ((y 1)) y)", "y").is_err());
}

#[test]
fn closure_bodies_do_not_leak() {
    let source = "
        (define f (lambda (a) (define inner a)))
        (f 3)";
    assert!(eval_after(source, "inner").is_err());
    assert!(eval_after(source, "a").is_err());
}

#[test]
fn closures_capture_their_defining_scope() {
    let source = "
        (define make-adder (lambda (n) (lambda (x) (+ x n))))
        (define add5 (make-adder 5))
        (define n 100)";
    assert_eq!(eval_after(source, "(add5 1)").unwrap(), Some(int(6)));
}

#[test]
fn independent_closures_from_one_scope() {
    let source = "
        (define pair (lambda (n) (list (lambda () n) (lambda () (* n 2)))))
        (define fs (pair 7))";
    assert_eq!(eval_after(source, "((car fs))").unwrap(), Some(int(7)));
    assert_eq!(eval_after(source, "((car (cdr fs)))").unwrap(), Some(int(14)));
}

// =============================================================================
// RECURSION
// =============================================================================

#[test]
fn factorial() {
    let source = "(define fact (lambda (n) (if (= n 0) 1 (* n (fact (- n 1))))))";
    assert_eq!(eval_after(source, "(fact 5)").unwrap(), Some(int(120)));
    assert_eq!(eval_after(source, "(fact 0)").unwrap(), Some(int(1)));
}

#[test]
fn recursion_over_lists() {
    let source = "
        (define length (lambda (xs) (if (null? xs) 0 (+ 1 (length (cdr xs))))))
        (define map (lambda (f xs)
          (if (null? xs)
              null
              (cons (f (car xs)) (map f (cdr xs))))))";
    assert_eq!(eval_after(source, "(length (list 1 2 3 4))").unwrap(), Some(int(4)));
    assert_eq!(
        eval_after(source, "(map (lambda (x) (* x x)) (list 1 2 3))").unwrap(),
        Some(list(vec![int(1), int(4), int(9)]))
    );
}

#[test]
fn fibonacci() {
    let source = "
        (define fib (lambda (n)
          (if (< n 2)
              n
              (+ (fib (- n 1)) (fib (- n 2))))))";
    assert_eq!(eval_after(source, "(fib 15)").unwrap(), Some(int(610)));
}

// =============================================================================
// LISTS
// =============================================================================

#[test]
fn cons_onto_a_list() {
    assert_eq!(
        eval("(cons 1 (list 2 3))").unwrap(),
        list(vec![int(1), int(2), int(3)])
    );
}

#[test]
fn car_cdr_null() {
    assert_eq!(eval("(car (list 4 5))").unwrap(), int(4));
    assert_eq!(eval("(cdr (list 4 5))").unwrap(), list(vec![int(5)]));
    assert_eq!(eval("(null? (cdr (list 4)))").unwrap(), Value::Bool(true));
    assert_eq!(eval("(null? null)").unwrap(), Value::Bool(true));
}

// =============================================================================
// OUTPUT
// =============================================================================

#[test]
fn display_renders_values() {
    let (result, out) = displayed(
        "(display 1)
         (display 2.5)
         (display #f)
         (display (list 1 (list 2) null))
         (display (lambda (x y) x))",
    );
    assert!(result.is_ok());
    assert_eq!(out, "1\n2.5\n#f\n(1 (2) ())\n#<closure (x y)>\n");
}
