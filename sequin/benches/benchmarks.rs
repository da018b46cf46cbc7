use codspeed_criterion_compat::{Criterion, black_box, criterion_group, criterion_main};
use sequin::{EqualityComparer, KeyedBucketStore, Record, Sequence, Value, sequence};
use std::time::Duration;

fn numbers(n: i64) -> Sequence<i64> {
    Sequence::range(0, n).unwrap()
}

// ============================================================================
// Deferred Pipeline Benchmarks
// ============================================================================

fn bench_where_select(c: &mut Criterion) {
    let source = numbers(10_000);
    c.bench_function("where + select (10k)", |b| {
        b.iter(|| {
            black_box(
                source
                    .where_(|x| x % 3 == 0)
                    .select(|x| x * 2)
                    .count(),
            )
        })
    });
}

fn bench_take_from_long_chain(c: &mut Criterion) {
    let source = numbers(1_000_000);
    c.bench_function("take 10 from 1M chain", |b| {
        b.iter(|| black_box(source.select(|x| x + 1).where_(|x| x % 2 == 0).take(10).to_list()))
    });
}

fn bench_select_many(c: &mut Criterion) {
    let source = numbers(1_000);
    c.bench_function("select_many (1k x 10)", |b| {
        b.iter(|| black_box(source.select_many(|x| vec![*x; 10]).count()))
    });
}

// ============================================================================
// Keyed Operator Benchmarks
// ============================================================================

fn bench_distinct(c: &mut Criterion) {
    let source = numbers(10_000).select(|x| x % 1_000);
    c.bench_function("distinct (10k, 1k unique)", |b| {
        b.iter(|| black_box(source.distinct().count()))
    });
}

fn bench_group_by(c: &mut Criterion) {
    let source = numbers(10_000);
    c.bench_function("group_by (10k, 100 keys)", |b| {
        b.iter(|| black_box(source.group_by(|x| x % 100).count()))
    });
}

fn bench_join(c: &mut Criterion) {
    let outer = numbers(5_000);
    let inner = numbers(1_000).select(|x| (x % 500, *x));
    c.bench_function("join (5k x 1k)", |b| {
        b.iter(|| {
            let joined = outer.join(inner.clone(), |x| x % 500, |i| i.0, |o, i| o + i.1);
            black_box(joined.count())
        })
    });
}

fn bench_set_algebra(c: &mut Criterion) {
    let a = numbers(5_000);
    let b_side = numbers(5_000).select(|x| x + 2_500);
    c.bench_function("union + intersect + except (5k)", |b| {
        b.iter(|| {
            black_box((
                a.union(b_side.clone()).count(),
                a.intersect(b_side.clone()).count(),
                a.except(b_side.clone()).count(),
            ))
        })
    });
}

fn bench_store_insert(c: &mut Criterion) {
    c.bench_function("bucket store insert (10k, grows)", |b| {
        b.iter(|| {
            let mut store = KeyedBucketStore::new(EqualityComparer::default());
            for i in 0..10_000i64 {
                store.insert_unique(i, i);
            }
            black_box(store.len())
        })
    });
}

// ============================================================================
// Ordering Benchmarks
// ============================================================================

fn bench_order_by(c: &mut Criterion) {
    let source = numbers(10_000).select(|x| (x * 7_919) % 10_007);
    c.bench_function("order_by (10k)", |b| {
        b.iter(|| black_box(source.order_by(|x| *x).first()))
    });
}

fn bench_order_by_then_by(c: &mut Criterion) {
    let source = numbers(10_000).select(|x| (x % 10, (x * 31) % 97));
    c.bench_function("order_by + then_by (10k)", |b| {
        b.iter(|| black_box(source.order_by(|p| p.0).then_by(|p| p.1).last()))
    });
}

// ============================================================================
// Dynamic Value Benchmarks
// ============================================================================

fn bench_dynamic_records(c: &mut Criterion) {
    let rows: Vec<Value> = (0..2_000)
        .map(|i| Value::object(Record::new().with("id", i).with("group", i % 20)))
        .collect();
    let rows = Value::array(rows);
    let key = Value::function(1, |args| match &args[0] {
        Value::Object(record) => record.get("group").unwrap_or_default(),
        _ => Value::Undefined,
    });
    c.bench_function("group_by_dyn over records (2k)", |b| {
        b.iter(|| {
            let groups = sequence(rows.clone()).group_by_dyn(&key, &Value::Null).unwrap();
            black_box(groups.count())
        })
    });
}

fn bench_distinct_strings(c: &mut Criterion) {
    let words: Vec<Value> = (0..5_000).map(|i| Value::string(format!("w{}", i % 700))).collect();
    let source = Sequence::from(words);
    c.bench_function("distinct strings (5k)", |b| {
        b.iter(|| black_box(source.distinct().count()))
    });
}

criterion_group! {
    name = pipeline_benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_where_select,
        bench_take_from_long_chain,
        bench_select_many
}

criterion_group! {
    name = keyed_benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_distinct,
        bench_group_by,
        bench_join,
        bench_set_algebra,
        bench_store_insert
}

criterion_group! {
    name = ordering_benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_order_by,
        bench_order_by_then_by
}

criterion_group! {
    name = dynamic_benches;
    config = Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_dynamic_records,
        bench_distinct_strings
}

criterion_main!(
    pipeline_benches,
    keyed_benches,
    ordering_benches,
    dynamic_benches
);
