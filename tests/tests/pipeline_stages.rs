//! Pipeline stage integration tests.
//!
//! These tests run hand-built pipelines against the league fixture.

use dex_tests::prelude::*;

fn by_tot_desc() -> Stage {
    Stage::sort([SortKey::desc("stats.tot"), SortKey::asc("_id")])
}

mod limit_and_sort {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("limit_and_sort")
            .fixture(league())
            .aggregate(
                "top_three",
                POKEMON,
                Pipeline::new(vec![by_tot_desc(), Stage::limit(3)]),
                |a| a.rows(3).column("name", ["Venusaur", "Ivysaur", "Bulbasaur"]),
            )
            .aggregate(
                "limit_above_count",
                POKEMON,
                Pipeline::new(vec![by_tot_desc(), Stage::limit(50)]),
                |a| {
                    a.column(
                        "name",
                        ["Venusaur", "Ivysaur", "Bulbasaur", "Squirtle", "Charmander"],
                    )
                },
            )
            .aggregate(
                "skip_then_limit",
                POKEMON,
                Pipeline::new(vec![by_tot_desc(), Stage::skip(1), Stage::limit(2)]),
                |a| a.column("name", ["Ivysaur", "Bulbasaur"]),
            )
            .aggregate(
                "limit_zero",
                POKEMON,
                Pipeline::new(vec![Stage::limit(0)]),
                |a| a.empty(),
            )
            .aggregate(
                "negative_limit",
                POKEMON,
                Pipeline::new(vec![by_tot_desc(), Stage::limit(-1)]),
                |a| a.error("Invalid $limit value: -1"),
            )
            .aggregate(
                "negative_skip",
                POKEMON,
                Pipeline::new(vec![Stage::skip(-2)]),
                |a| a.error_matching(r"\$skip.*-2"),
            )
    }

    #[test]
    fn test_limit_keeps_sort_order() {
        scenario().run().unwrap();
    }
}

mod strongest_per_type {
    use super::*;

    fn strongest(sorted: bool) -> Pipeline {
        let mut stages = vec![Stage::unwind("types")];
        if sorted {
            stages.push(by_tot_desc());
        }
        stages.push(Stage::group(
            Expr::field("types"),
            [
                AccumulatorSpec::new("strongest", Accumulator::First(Expr::field("name"))),
                AccumulatorSpec::new("weakest", Accumulator::Last(Expr::field("name"))),
                AccumulatorSpec::new("members", Accumulator::Count),
            ],
        ));
        stages.push(Stage::sort([SortKey::asc("_id")]));
        Pipeline::new(stages)
    }

    pub fn scenario() -> Scenario {
        Scenario::new("strongest_per_type")
            .fixture(league())
            .aggregate("sorted_first", POKEMON, strongest(true), |a| {
                a.returns(vec![
                    doc! { "_id" => "10", "strongest" => "Charmander", "weakest" => "Charmander", "members" => 1i64 },
                    doc! { "_id" => "11", "strongest" => "Squirtle", "weakest" => "Squirtle", "members" => 1i64 },
                    doc! { "_id" => "12", "strongest" => "Venusaur", "weakest" => "Bulbasaur", "members" => 3i64 },
                    doc! { "_id" => "4", "strongest" => "Venusaur", "weakest" => "Bulbasaur", "members" => 3i64 },
                ])
            })
            .aggregate("unsorted_first", POKEMON, strongest(false), |a| {
                a.error("requires a preceding sort")
            })
    }

    #[test]
    fn test_first_after_sort_picks_strongest() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_unordered_first_allowed_when_configured() {
        Scenario::new("unordered_first")
            .fixture(league())
            .config(ExecutorConfig::new().with_require_ordered_first(false))
            .aggregate("insertion_order", POKEMON, strongest(false), |a| {
                a.rows(4).contains(doc! { "_id" => "12", "strongest" => "Bulbasaur" })
            })
            .run()
            .unwrap();
    }
}

mod lookups {
    use super::*;

    fn next_stage(id: &str) -> Pipeline {
        Pipeline::new(vec![
            Stage::matching(Predicate::eq("_id", id)),
            Stage::lookup(POKEMON, "evolves_to", "_id", "next"),
            Stage::project([ProjectField::include("name"), ProjectField::include("next")]),
        ])
    }

    pub fn scenario() -> Scenario {
        Scenario::new("lookups")
            .fixture(league())
            .aggregate("dangling_reference", POKEMON, next_stage("7"), |a| {
                a.rows(1).column("next", [Value::Array(vec![])])
            })
            .aggregate("final_stage", POKEMON, next_stage("3"), |a| {
                a.column("next", [Value::Array(vec![])])
            })
            .aggregate("resolved", POKEMON, next_stage("1"), |a| {
                a.column("next.name", [Value::from(vec!["Ivysaur"])])
            })
            .aggregate(
                "array_foreign_field",
                POKEMON,
                Pipeline::new(vec![
                    Stage::matching(Predicate::eq("_id", "4")),
                    Stage::lookup(TRAINER, "_id", "owns", "owners"),
                    Stage::project([ProjectField::computed("owners", Expr::field("owners.name"))]),
                ]),
                |a| a.column("owners", [Value::from(vec!["Ash"])]),
            )
            .aggregate(
                "document_local_field",
                BATTLE,
                Pipeline::new(vec![Stage::lookup(TRAINER, "participants", "_id", "t")]),
                |a| a.error("Invalid lookup field participants"),
            )
    }

    #[test]
    fn test_lookup_semantics() {
        scenario().run().unwrap();
    }
}

mod graph_lookup {
    use super::*;

    fn cycle() -> Fixture {
        Fixture::new()
            .with(POKEMON, pokemon("1", "Porygon").evolves_to("2").build())
            .with(POKEMON, pokemon("2", "Porygon2").evolves_to("1").build())
    }

    fn chain(max_depth: Option<usize>) -> Pipeline {
        let mut spec = GraphLookupSpec::new(POKEMON, Expr::field("evolves_to"), "evolves_to", "_id", "chain")
            .with_depth_field("depth");
        if let Some(depth) = max_depth {
            spec = spec.with_max_depth(depth);
        }
        Pipeline::new(vec![
            Stage::graph_lookup(spec),
            Stage::add_fields([
                ("names", Expr::field("chain.name")),
                ("depths", Expr::field("chain.depth")),
            ]),
            Stage::sort([SortKey::asc("_id")]),
        ])
    }

    pub fn scenario() -> Scenario {
        Scenario::new("graph_lookup_cycle")
            .fixture(cycle())
            .aggregate("cycle_terminates", POKEMON, chain(None), |a| {
                a.column(
                    "names",
                    [
                        Value::from(vec!["Porygon2", "Porygon"]),
                        Value::from(vec!["Porygon", "Porygon2"]),
                    ],
                )
                .column("depths", [Value::from(vec![0i64, 1]), Value::from(vec![0i64, 1])])
            })
            .aggregate("max_depth_zero", POKEMON, chain(Some(0)), |a| {
                a.column(
                    "names",
                    [Value::from(vec!["Porygon2"]), Value::from(vec!["Porygon"])],
                )
            })
    }

    #[test]
    fn test_cycle_visits_each_node_once() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_executor_depth_cap() {
        Scenario::new("graph_lookup_capped")
            .fixture(league())
            .config(ExecutorConfig::new().with_max_graph_depth(0))
            .aggregate(
                "bulbasaur_line",
                POKEMON,
                Pipeline::new(vec![Stage::matching(Predicate::eq("_id", "1"))]).then(
                    Stage::graph_lookup(GraphLookupSpec::new(
                        POKEMON,
                        Expr::field("evolves_to"),
                        "evolves_to",
                        "_id",
                        "chain",
                    )),
                ),
                |a| a.custom(|out| matches!(out, StepOutput::Documents(d) if d[0].resolve("chain.name") == Value::from(vec!["Ivysaur"]))),
            )
            .run()
            .unwrap();
    }
}

mod shape_stages {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("shape_stages")
            .fixture(league())
            .aggregate(
                "union_and_count",
                TRAINER,
                Pipeline::new(vec![
                    Stage::project([ProjectField::include("name")]),
                    Stage::union_with(GYM, vec![Stage::project([ProjectField::include("name")])]),
                    Stage::count("named"),
                ]),
                |a| a.returns(vec![doc! { "named" => 5i64 }]),
            )
            .aggregate(
                "count_nothing",
                BATTLE,
                Pipeline::new(vec![
                    Stage::matching(Predicate::eq("gym_id", "99")),
                    Stage::count("battles"),
                ]),
                |a| a.returns(vec![doc! { "battles" => 0i64 }]),
            )
            .aggregate(
                "unwind_preserving_empty",
                TRAINER,
                Pipeline::new(vec![Stage::unwind_preserving("owns"), Stage::count("rows")]),
                |a| a.returns(vec![doc! { "rows" => 4i64 }]),
            )
            .aggregate(
                "unwind_scalar",
                POKEMON,
                Pipeline::new(vec![Stage::unwind("name")]),
                |a| a.error("Cannot unwind name"),
            )
            .aggregate(
                "computed_stats",
                POKEMON,
                Pipeline::new(vec![
                    Stage::matching(Predicate::and([
                        Predicate::gte("stats.tot", 310i64),
                        Predicate::is_in("types", ["12"]),
                    ])),
                    Stage::project([
                        ProjectField::exclude("_id"),
                        ProjectField::include("name"),
                        ProjectField::computed(
                            "per_stat",
                            Expr::round(Expr::divide(Expr::field("stats.tot"), Expr::lit(3i64)), 1),
                        ),
                    ]),
                ]),
                |a| {
                    a.returns(vec![
                        doc! { "name" => "Bulbasaur", "per_stat" => 106.0 },
                        doc! { "name" => "Ivysaur", "per_stat" => 135.0 },
                        doc! { "name" => "Venusaur", "per_stat" => 175.0 },
                    ])
                },
            )
    }

    #[test]
    fn test_shape_stages() {
        scenario().run().unwrap();
    }
}
