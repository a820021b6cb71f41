#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retrolog::builtins::nat;
use retrolog::{Bindings, KnowledgeBase, Term};

fn setup_link_graph() -> KnowledgeBase {
    let mut knowledge: Vec<Term> = (0..50)
        .map(|i| {
            Term::fact(
                "link",
                vec![
                    Term::lit(format!("node_{i}")),
                    Term::lit(format!("node_{}", i + 1)),
                ],
            )
        })
        .collect();

    // Base case rule: path(x, y) <- link(x, y)
    knowledge.push(Term::rule(
        "path",
        vec![Term::var("x"), Term::var("y")],
        Term::fact("link", vec![Term::var("x"), Term::var("y")]),
    ));

    // Recursive rule: path(x, z) <- link(x, y), path(y, z)
    knowledge.push(Term::rule(
        "path",
        vec![Term::var("x"), Term::var("z")],
        Term::fact("link", vec![Term::var("x"), Term::var("y")])
            .and(Term::fact("path", vec![Term::var("y"), Term::var("z")])),
    ));

    KnowledgeBase::new(knowledge).unwrap()
}

fn query_first_path(c: &mut Criterion) {
    let kb = setup_link_graph();

    c.bench_function("query_first_path", |b| {
        b.iter(|| {
            let query = Term::fact(
                "path",
                vec![Term::lit("node_0"), Term::var("x")],
            );
            black_box(kb.ask(&query).unwrap().next())
        });
    });
}

fn query_existence_check(c: &mut Criterion) {
    let kb = setup_link_graph();

    c.bench_function("query_existence_check", |b| {
        b.iter(|| {
            let query = Term::fact(
                "path",
                vec![Term::lit("node_0"), Term::lit("node_20")],
            );
            black_box(kb.ask(&query).unwrap().has_next())
        });
    });
}

fn query_all_reachable(c: &mut Criterion) {
    let kb = setup_link_graph();

    c.bench_function("query_all_reachable", |b| {
        b.iter(|| {
            let query = Term::fact(
                "path",
                vec![Term::lit("node_40"), Term::var("x")],
            );
            let answers: Vec<Bindings> = kb.ask(&query).unwrap().collect();
            black_box(answers)
        });
    });
}

fn query_nat_addition(c: &mut Criterion) {
    let kb = KnowledgeBase::new(nat::arithmetic_axioms()).unwrap();

    c.bench_function("query_nat_addition", |b| {
        b.iter(|| {
            let query = nat::add(
                nat::from_usize(8),
                nat::from_usize(8),
                Term::var("result"),
            );
            black_box(kb.ask(&query).unwrap().next())
        });
    });
}

criterion_group!(
    benches,
    query_first_path,
    query_existence_check,
    query_all_reachable,
    query_nat_addition
);
criterion_main!(benches);
