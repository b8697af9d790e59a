//! Canonical pipelines over the Pokémon dataset.
//!
//! Each function returns a [`CatalogQuery`]: the collection the pipeline runs
//! over plus the pipeline itself.

use dex_core::{Document, BATTLE, EVOLVES_TO_FIELD, ID_FIELD, OWNS_FIELD, POKEMON, TRAINER, TYPE};

use crate::aggregates::Accumulator;
use crate::executor::PipelineExecutor;
use crate::expr::{CmpOp, Expr, Predicate};
use crate::stage::{AccumulatorSpec, GraphLookupSpec, Pipeline, ProjectField, SortKey, Stage};
use crate::QueryResult;
use tracing::debug;

/// A named pipeline bound to its source collection.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub name: &'static str,
    pub collection: &'static str,
    pub pipeline: Pipeline,
}

impl CatalogQuery {
    fn new(name: &'static str, collection: &'static str, stages: Vec<Stage>) -> Self {
        Self {
            name,
            collection,
            pipeline: Pipeline::new(stages),
        }
    }

    /// Run the query with `executor`.
    pub fn run(&self, executor: &PipelineExecutor<'_>) -> QueryResult<Vec<Document>> {
        debug!(query = self.name, "running catalog query");
        executor.aggregate(self.collection, &self.pipeline)
    }
}

/// The Pokémon with the most battle wins: `{pokemon_name, wins}`.
pub fn most_winning_pokemon() -> CatalogQuery {
    CatalogQuery::new(
        "most_winning_pokemon",
        BATTLE,
        vec![
            Stage::group(
                Expr::field("participants.winner.pokemon_id"),
                [AccumulatorSpec::new("wins", Accumulator::Sum(Expr::lit(1i64)))],
            ),
            Stage::sort([SortKey::desc("wins"), SortKey::asc(ID_FIELD)]),
            Stage::limit(1),
            Stage::lookup(POKEMON, ID_FIELD, ID_FIELD, "pokemon"),
            Stage::unwind("pokemon"),
            Stage::project([
                ProjectField::exclude(ID_FIELD),
                ProjectField::computed("pokemon_name", Expr::field("pokemon.name")),
                ProjectField::include("wins"),
            ]),
        ],
    )
}

/// The Pokémon with the highest stat total: `{name}`.
pub fn most_powerful_pokemon() -> CatalogQuery {
    CatalogQuery::new(
        "most_powerful_pokemon",
        POKEMON,
        vec![
            Stage::project([
                ProjectField::include("name"),
                ProjectField::computed("tot", Expr::field("stats.tot")),
            ]),
            Stage::sort([SortKey::desc("tot")]),
            Stage::limit(1),
            Stage::project([ProjectField::exclude(ID_FIELD), ProjectField::include("name")]),
        ],
    )
}

/// The strongest Pokémon of every type: `{pokemon, total, type}`, by type name.
pub fn most_powerful_by_type() -> CatalogQuery {
    CatalogQuery::new(
        "most_powerful_by_type",
        POKEMON,
        vec![
            Stage::unwind("types"),
            Stage::sort([SortKey::desc("stats.tot")]),
            Stage::group(
                Expr::field("types"),
                [
                    AccumulatorSpec::new("pokemon", Accumulator::First(Expr::field("name"))),
                    AccumulatorSpec::new("total", Accumulator::First(Expr::field("stats.tot"))),
                ],
            ),
            Stage::lookup(TYPE, ID_FIELD, ID_FIELD, "typeInfo"),
            Stage::unwind("typeInfo"),
            Stage::project([
                ProjectField::exclude(ID_FIELD),
                ProjectField::include("pokemon"),
                ProjectField::include("total"),
                ProjectField::computed("type", Expr::field("typeInfo.name")),
            ]),
            Stage::sort([SortKey::asc("type")]),
        ],
    )
}

/// One Pokémon with the trainers owning it under `Owner`.
pub fn pokemon_owners(pokemon_id: &str) -> CatalogQuery {
    CatalogQuery::new(
        "pokemon_owners",
        POKEMON,
        vec![
            Stage::matching(Predicate::eq(ID_FIELD, pokemon_id)),
            Stage::lookup(TRAINER, ID_FIELD, OWNS_FIELD, "Owner"),
        ],
    )
}

/// The evolution line following one Pokémon:
/// `{name, chain, stages, improvement}`.
///
/// `chain` lists the names of later stages in order, `stages` counts the
/// Pokémon itself plus its evolutions, and `improvement` is the final stage's
/// total minus this Pokémon's total (0 when it does not evolve).
pub fn evolution_chain(pokemon_id: &str) -> CatalogQuery {
    let evolutions = Expr::size(Expr::field("chain"));
    let improvement = Expr::cond(
        Predicate::expr(evolutions.clone(), CmpOp::Gt, Expr::lit(0i64)),
        Expr::subtract(
            Expr::array_elem_at(Expr::field("chain.stats.tot"), -1),
            Expr::field("stats.tot"),
        ),
        Expr::lit(0i64),
    );

    CatalogQuery::new(
        "evolution_chain",
        POKEMON,
        vec![
            Stage::matching(Predicate::eq(ID_FIELD, pokemon_id)),
            Stage::graph_lookup(
                GraphLookupSpec::new(
                    POKEMON,
                    Expr::field(EVOLVES_TO_FIELD),
                    EVOLVES_TO_FIELD,
                    ID_FIELD,
                    "chain",
                )
                .with_depth_field("depth"),
            ),
            Stage::project([
                ProjectField::exclude(ID_FIELD),
                ProjectField::include("name"),
                ProjectField::computed("chain", Expr::field("chain.name")),
                ProjectField::computed("stages", Expr::add([evolutions, Expr::lit(1i64)])),
                ProjectField::computed("improvement", improvement),
            ]),
        ],
    )
}

/// Win/loss record of every trainer that fought:
/// `{trainer_id, trainer, wins, losses, battles, ratio, tag}`, best ratio first.
pub fn trainer_win_ratio() -> CatalogQuery {
    let side = |path: &str, win: i64| {
        Stage::project([
            ProjectField::exclude(ID_FIELD),
            ProjectField::computed("trainer", Expr::field(path)),
            ProjectField::computed("win", Expr::lit(win)),
            ProjectField::computed("loss", Expr::lit(1 - win)),
        ])
    };

    CatalogQuery::new(
        "trainer_win_ratio",
        BATTLE,
        vec![
            side("participants.winner.trainer_id", 1),
            Stage::union_with(BATTLE, vec![side("participants.loser.trainer_id", 0)]),
            Stage::group(
                Expr::field("trainer"),
                [
                    AccumulatorSpec::new("wins", Accumulator::Sum(Expr::field("win"))),
                    AccumulatorSpec::new("losses", Accumulator::Sum(Expr::field("loss"))),
                    AccumulatorSpec::new("battles", Accumulator::Count),
                ],
            ),
            Stage::lookup(TRAINER, ID_FIELD, ID_FIELD, "trainerInfo"),
            Stage::unwind_preserving("trainerInfo"),
            Stage::project([
                ProjectField::exclude(ID_FIELD),
                ProjectField::computed("trainer_id", Expr::field(ID_FIELD)),
                ProjectField::computed("trainer", Expr::field("trainerInfo.name")),
                ProjectField::include("wins"),
                ProjectField::include("losses"),
                ProjectField::include("battles"),
                ProjectField::computed(
                    "ratio",
                    Expr::round(
                        Expr::divide(Expr::field("wins"), Expr::field("battles")),
                        2,
                    ),
                ),
                ProjectField::computed(
                    "tag",
                    Expr::cond(
                        Predicate::expr(Expr::field("wins"), CmpOp::Gte, Expr::field("losses")),
                        Expr::lit("winning"),
                        Expr::lit("losing"),
                    ),
                ),
            ]),
            Stage::sort([
                SortKey::desc("ratio"),
                SortKey::desc("wins"),
                SortKey::asc("trainer_id"),
            ]),
        ],
    )
}

/// Number of battles hosted by a gym: `{battles}`.
pub fn gym_battle_count(gym_id: &str) -> CatalogQuery {
    CatalogQuery::new(
        "gym_battle_count",
        BATTLE,
        vec![
            Stage::matching(Predicate::eq("gym_id", gym_id)),
            Stage::count("battles"),
        ],
    )
}
