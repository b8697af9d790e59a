//! Catalog query integration tests.

use dex_tests::prelude::*;

fn win(id: &str, winner_pokemon: &str, loser_pokemon: &str) -> Document {
    battle(id, "1", side("1", winner_pokemon), side("2", loser_pokemon))
}

mod most_winning {
    use super::*;

    fn rivals() -> Fixture {
        Fixture::new()
            .with(POKEMON, pokemon("1", "p1").types(["11"]).build())
            .with(POKEMON, pokemon("2", "p2").types(["11"]).build())
            .with_all(
                BATTLE,
                [
                    win("1", "1", "2"),
                    win("2", "2", "1"),
                    win("3", "1", "2"),
                    win("4", "1", "2"),
                ],
            )
    }

    pub fn scenario() -> Scenario {
        Scenario::new("most_winning")
            .fixture(rivals())
            .catalog("three_wins_beat_one", catalog::most_winning_pokemon(), |a| {
                a.returns(vec![doc! { "pokemon_name" => "p1", "wins" => 3i64 }])
            })
    }

    #[test]
    fn test_most_winning_pokemon() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        Scenario::new("most_winning_tie")
            .fixture(
                Fixture::new()
                    .with(POKEMON, pokemon("1", "p1").build())
                    .with(POKEMON, pokemon("2", "p2").build())
                    .with_all(BATTLE, [win("1", "2", "1"), win("2", "1", "2")]),
            )
            .catalog("tie", catalog::most_winning_pokemon(), |a| {
                a.returns(vec![doc! { "pokemon_name" => "p1", "wins" => 1i64 }])
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_no_battles() {
        Scenario::new("most_winning_empty")
            .fixture(Fixture::new().with(POKEMON, pokemon("1", "p1").build()))
            .catalog("nothing", catalog::most_winning_pokemon(), |a| a.empty())
            .run()
            .unwrap();
    }
}

mod most_powerful {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("most_powerful")
            .fixture(
                Fixture::new()
                    .with(TYPE, type_record("11", "Water"))
                    .with(POKEMON, pokemon("1", "p1").tot(300).types(["11"]).build())
                    .with(POKEMON, pokemon("2", "p2").tot(500).types(["11"]).build()),
            )
            .catalog("highest_total", catalog::most_powerful_pokemon(), |a| {
                a.returns(vec![doc! { "name" => "p2" }])
            })
            .catalog("per_type", catalog::most_powerful_by_type(), |a| {
                a.returns(vec![doc! { "pokemon" => "p2", "total" => 500i64, "type" => "Water" }])
            })
    }

    #[test]
    fn test_most_powerful_pokemon() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_most_powerful_by_type_on_league() {
        Scenario::new("most_powerful_league")
            .fixture(league())
            .catalog("per_type", catalog::most_powerful_by_type(), |a| {
                a.returns(vec![
                    doc! { "pokemon" => "Charmander", "total" => 309i64, "type" => "Fire" },
                    doc! { "pokemon" => "Venusaur", "total" => 525i64, "type" => "Grass" },
                    doc! { "pokemon" => "Venusaur", "total" => 525i64, "type" => "Poison" },
                    doc! { "pokemon" => "Squirtle", "total" => 314i64, "type" => "Water" },
                ])
            })
            .run()
            .unwrap();
    }
}

mod league_reports {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("league_reports")
            .fixture(league())
            .catalog("charmander_owners", catalog::pokemon_owners("4"), |a| {
                a.rows(1).column("Owner.name", [Value::from(vec!["Ash"])])
            })
            .catalog("unowned", catalog::pokemon_owners("3"), |a| {
                a.column("Owner", [Value::Array(vec![])])
            })
            .catalog("bulbasaur_line", catalog::evolution_chain("1"), |a| {
                a.returns(vec![doc! {
                    "name" => "Bulbasaur",
                    "chain" => vec!["Ivysaur", "Venusaur"],
                    "stages" => 3i64,
                    "improvement" => 207i64,
                }])
            })
            .catalog("dangling_line", catalog::evolution_chain("7"), |a| {
                a.returns(vec![doc! {
                    "name" => "Squirtle",
                    "chain" => Value::Array(vec![]),
                    "stages" => 1i64,
                    "improvement" => 0i64,
                }])
            })
            .catalog("win_ratios", catalog::trainer_win_ratio(), |a| {
                a.returns(vec![
                    doc! {
                        "trainer_id" => "1", "trainer" => "Ash", "wins" => 2i64, "losses" => 1i64,
                        "battles" => 3i64, "ratio" => 0.67, "tag" => "winning",
                    },
                    doc! {
                        "trainer_id" => "2", "trainer" => "Misty", "wins" => 1i64, "losses" => 1i64,
                        "battles" => 2i64, "ratio" => 0.5, "tag" => "winning",
                    },
                    doc! {
                        "trainer_id" => "3", "trainer" => "Brock", "wins" => 0i64, "losses" => 1i64,
                        "battles" => 1i64, "ratio" => 0.0, "tag" => "losing",
                    },
                ])
            })
            .catalog("pewter_battles", catalog::gym_battle_count("1"), |a| {
                a.returns(vec![doc! { "battles" => 2i64 }])
            })
            .catalog("empty_gym", catalog::gym_battle_count("9"), |a| {
                a.returns(vec![doc! { "battles" => 0i64 }])
            })
    }

    #[test]
    fn test_league_reports() {
        scenario().run().unwrap();
    }
}
