use cleansheet_core::Table;
use cleansheet_pipeline::{apply, CommandSpec};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn build_table(rows: usize) -> Table {
    let mut data = vec![vec![
        "name".to_string(),
        "score".to_string(),
        "city".to_string(),
    ]];
    for i in 0..rows {
        if i % 10 == 0 {
            data.push(vec![String::new(), String::new(), String::new()]);
        } else {
            data.push(vec![
                format!("  person-{} ", i % (rows / 2 + 1)),
                format!("{}", i % 100),
                "Springfield".to_string(),
            ]);
        }
    }
    Table::from_data(data)
}

fn cleaning_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("trim").with_param("column", 0),
        CommandSpec::new("removeEmptyRows"),
        CommandSpec::new("filterRows")
            .with_param("column", 1)
            .with_param("operator", "greaterThan")
            .with_param("value", 10),
        CommandSpec::new("dedupe").with_param("columns", vec![0]),
    ]
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_apply");
    let commands = cleaning_commands();

    for size in [100, 1_000, 10_000] {
        let table = build_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| apply(black_box(table.clone()), black_box(&commands)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
