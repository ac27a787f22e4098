use crate::model::{Evolution, Pokemon};

fn edges(pairs: &[(&str, &str)]) -> Option<Vec<Evolution>> {
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|(num, name)| Evolution::new(*num, *name))
            .collect(),
    )
}

#[allow(clippy::too_many_arguments)]
fn starter(
    num: &str,
    name: &str,
    types: &[&str],
    height: &str,
    weight: &str,
    candy: &str,
    candy_count: Option<i64>,
    egg: &str,
    spawn_chance: f64,
    avg_spawns: f64,
    spawn_time: &str,
    multipliers: Option<&[f64]>,
    weaknesses: &[&str],
    prev: &[(&str, &str)],
    next: &[(&str, &str)],
) -> Pokemon {
    Pokemon {
        id: 0,
        pokedex_number: num.to_string(),
        name: name.to_string(),
        img: format!("http://www.serebii.net/pokemongo/pokemon/{}.png", num),
        types: types.iter().map(|t| t.to_string()).collect(),
        height: height.to_string(),
        weight: weight.to_string(),
        candy: candy.to_string(),
        candy_count,
        egg: egg.to_string(),
        spawn_chance,
        avg_spawns,
        spawn_time: spawn_time.to_string(),
        multipliers: multipliers.map(|m| m.to_vec()),
        weaknesses: weaknesses.iter().map(|w| w.to_string()).collect(),
        prev_evolution: edges(prev),
        next_evolution: edges(next),
    }
}

/// The three first-generation starter families, in pokedex order. Edge
/// lists are complete, so the dataset satisfies the chain invariants
/// from the start.
pub fn starter_pokemon() -> Vec<Pokemon> {
    vec![
        starter(
            "001", "Bulbasaur", &["Grass", "Poison"], "0.71 m", "6.9 kg",
            "Bulbasaur Candy", Some(25), "2 km", 0.69, 69.0, "20:00",
            Some(&[1.58]), &["Fire", "Ice", "Flying", "Psychic"],
            &[],
            &[("002", "Ivysaur"), ("003", "Venusaur")],
        ),
        starter(
            "002", "Ivysaur", &["Grass", "Poison"], "0.99 m", "13.0 kg",
            "Bulbasaur Candy", Some(100), "Not in Eggs", 0.042, 4.2, "07:00",
            Some(&[1.2, 1.6]), &["Fire", "Ice", "Flying", "Psychic"],
            &[("001", "Bulbasaur")],
            &[("003", "Venusaur")],
        ),
        starter(
            "003", "Venusaur", &["Grass", "Poison"], "2.01 m", "100.0 kg",
            "Bulbasaur Candy", None, "Not in Eggs", 0.017, 1.7, "11:30",
            None, &["Fire", "Ice", "Flying", "Psychic"],
            &[("001", "Bulbasaur"), ("002", "Ivysaur")],
            &[],
        ),
        starter(
            "004", "Charmander", &["Fire"], "0.61 m", "8.5 kg",
            "Charmander Candy", Some(25), "2 km", 0.253, 25.3, "08:45",
            Some(&[1.65]), &["Water", "Ground", "Rock"],
            &[],
            &[("005", "Charmeleon"), ("006", "Charizard")],
        ),
        starter(
            "005", "Charmeleon", &["Fire"], "1.09 m", "19.0 kg",
            "Charmander Candy", Some(100), "Not in Eggs", 0.012, 1.2, "19:00",
            Some(&[1.79]), &["Water", "Ground", "Rock"],
            &[("004", "Charmander")],
            &[("006", "Charizard")],
        ),
        starter(
            "006", "Charizard", &["Fire", "Flying"], "1.70 m", "90.5 kg",
            "Charmander Candy", None, "Not in Eggs", 0.0031, 0.31, "13:34",
            None, &["Water", "Electric", "Rock"],
            &[("004", "Charmander"), ("005", "Charmeleon")],
            &[],
        ),
        starter(
            "007", "Squirtle", &["Water"], "0.51 m", "9.0 kg",
            "Squirtle Candy", Some(25), "2 km", 0.58, 58.0, "04:25",
            Some(&[2.1]), &["Electric", "Grass"],
            &[],
            &[("008", "Wartortle"), ("009", "Blastoise")],
        ),
        starter(
            "008", "Wartortle", &["Water"], "0.99 m", "22.5 kg",
            "Squirtle Candy", Some(100), "Not in Eggs", 0.034, 3.4, "07:02",
            Some(&[1.4]), &["Electric", "Grass"],
            &[("007", "Squirtle")],
            &[("009", "Blastoise")],
        ),
        starter(
            "009", "Blastoise", &["Water"], "1.60 m", "85.5 kg",
            "Squirtle Candy", None, "Not in Eggs", 0.0067, 0.67, "00:06",
            None, &["Electric", "Grass"],
            &[("007", "Squirtle"), ("008", "Wartortle")],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_dataset_is_in_pokedex_order() {
        let all = starter_pokemon();
        assert_eq!(all.len(), 9);
        let nums: Vec<&str> = all.iter().map(|p| p.pokedex_number.as_str()).collect();
        let mut sorted = nums.clone();
        sorted.sort();
        assert_eq!(nums, sorted);
    }

    #[test]
    fn starter_dataset_edges_are_symmetric() {
        let all = starter_pokemon();
        for pokemon in &all {
            for edge in pokemon.next_evolution.iter().flatten() {
                let other = all
                    .iter()
                    .find(|p| p.pokedex_number == edge.num)
                    .expect("edge target must be in the dataset");
                assert!(
                    other
                        .prev_evolution
                        .iter()
                        .flatten()
                        .any(|e| e.num == pokemon.pokedex_number),
                    "{} -> {} has no mirrored prev edge",
                    pokemon.pokedex_number,
                    edge.num
                );
            }
        }
    }

    #[test]
    fn starter_dataset_converts_to_records() {
        for pokemon in starter_pokemon() {
            pokemon.to_record().expect("seed entry must be storable");
        }
    }
}
