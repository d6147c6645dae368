//! Benchmarks for form serialization and filter parsing, the two hot paths
//! on every reload trigger.

use circ_client::controls::filters::parse_query;
use circ_client::dom::Element;
use circ_client::form::ReactiveForm;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn search_form(controls: usize) -> ReactiveForm {
    let root = Element::new("form");
    let query = Element::new("input");
    query.set_attr("type", "text");
    query.set_attr("name", "query");
    query.set_value("café anglais");
    root.append_child(query);
    for index in 0..controls {
        let checkbox = Element::new("input");
        checkbox.set_attr("type", "checkbox");
        checkbox.set_attr("name", "format");
        checkbox.set_value(&format!("choice{index}"));
        checkbox.set_checked(index % 2 == 0);
        root.append_child(checkbox);
    }
    ReactiveForm::new(root, "/books/")
}

fn bench_serialize(c: &mut Criterion) {
    let form = search_form(24);
    c.bench_function("serialize_form_24_controls", |b| {
        b.iter(|| black_box(form.serialize()))
    });
}

fn bench_parse_query(c: &mut Criterion) {
    let query = "query=balzac&format=Book&format=Periodical&pub_year_0=1920&pub_year_1=1940&page=3&sort=relevance";
    c.bench_function("parse_query_mixed_filters", |b| {
        b.iter(|| black_box(parse_query(black_box(query))))
    });
}

criterion_group!(benches, bench_serialize, bench_parse_query);
criterion_main!(benches);
