//! Benchmarks for normalization, matching and ranking.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kondate_core::model::{Recipe, RecipeIngredientRef, SelectedIngredient, Unit};
use kondate_search::{
    filter_candidates_sync, kana, rank, Normalizer, ScriptDictionary, SearchMatcher, SortKey,
};
use std::sync::Arc;

const NAMES: [&str; 8] = [
    "玉ねぎと豚肉の生姜焼き",
    "肉じゃが",
    "ほうれん草のおひたし",
    "鶏の唐揚げ",
    "ニンジンしりしり",
    "大根と油揚げの味噌汁",
    "ﾄﾏﾄｻﾗﾀﾞ",
    "Salmon teriyaki",
];

fn create_recipes(count: usize) -> Vec<Recipe> {
    (0..count)
        .map(|i| {
            let mut recipe = Recipe::new(i as i64, NAMES[i % NAMES.len()]);
            recipe.cost_estimate = ((i * 37) % 900) as f64;
            recipe.cooking_time = ((i * 13) % 60) as f64;
            recipe.ingredients = (0..6)
                .map(|j| RecipeIngredientRef {
                    ingredient_id: ((i + j * 7) % 50) as i64,
                    quantity: 1.0,
                    unit: Unit::new(if j % 3 == 0 { "tablespoon" } else { "g" }),
                })
                .collect();
            recipe
        })
        .collect()
}

fn bench_fold(c: &mut Criterion) {
    c.bench_function("fold_mixed", |b| {
        b.iter(|| kana::fold(black_box("ﾄﾏﾄとタマネギのSALAD")))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new(Arc::new(ScriptDictionary::builtin()));

    let mut group = c.benchmark_group("normalize");
    for name in NAMES.iter().take(4) {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| normalizer.normalize(black_box(name)))
        });
    }
    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let matcher = SearchMatcher::from_dictionary(Arc::new(ScriptDictionary::builtin()));
    let scoped = matcher.session_scoped();
    let candidates: Vec<String> = (0..1000).map(|i| NAMES[i % NAMES.len()].to_string()).collect();

    let mut group = c.benchmark_group("matching");
    group.bench_function("sync_1000", |b| {
        b.iter(|| filter_candidates_sync(black_box("たまねぎ"), black_box(&candidates)))
    });
    group.bench_function("normalized_1000", |b| {
        b.iter(|| {
            candidates
                .iter()
                .filter(|c| matcher.match_now(black_box("たまねぎ"), c).matched)
                .count()
        })
    });
    group.bench_function("normalized_cached_1000", |b| {
        b.iter(|| {
            candidates
                .iter()
                .filter(|c| scoped.match_now(black_box("たまねぎ"), c).matched)
                .count()
        })
    });
    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let selected: Vec<_> = (0..20).map(|id| SelectedIngredient::new(id, 1.0)).collect();

    let mut group = c.benchmark_group("rank");
    for size in [100, 1000, 10000].iter() {
        let recipes = create_recipes(*size);
        group.bench_with_input(BenchmarkId::new("cost_asc", size), size, |b, _| {
            b.iter(|| rank(black_box(&recipes), SortKey::CostAsc, &selected))
        });
        group.bench_with_input(BenchmarkId::new("ingredient_match_desc", size), size, |b, _| {
            b.iter(|| rank(black_box(&recipes), SortKey::IngredientMatchDesc, &selected))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fold, bench_normalize, bench_matching, bench_rank);
criterion_main!(benches);
