//! Example structural causal models for tests and benchmarks.
//!
//! Every constructor returns a frozen model seeded with [`FIXTURE_SEED`]
//! unless a seed is given. Exogenous roots draw fair coins unless noted.

use counterfact_core::errors::ScmResult;
use counterfact_core::{Assignment, Value, Variable};
use counterfact_scm::{NoiseDistribution, ParentValues, StructuralCausalModel, StructuralFunction};

pub const FIXTURE_SEED: u64 = 42;

/// Build a frozen model, panicking with the fixture name on failure.
///
/// # Panics
/// Panics if the fixture definition is invalid.
fn build<F>(name: &str, seed: u64, define: F) -> StructuralCausalModel
where
    F: FnOnce(&mut StructuralCausalModel) -> ScmResult<()>,
{
    let mut model = StructuralCausalModel::with_seed(seed);
    define(&mut model)
        .and_then(|()| model.freeze())
        .unwrap_or_else(|e| panic!("fixture {name} failed to build: {e}"));
    model
}

fn coin_roots(model: &mut StructuralCausalModel, names: &[&str]) -> ScmResult<()> {
    for name in names {
        model.insert_variable(Variable::boolean(*name))?;
        model.set_structural_function(name, StructuralFunction::exogenous(NoiseDistribution::coin()))?;
    }
    Ok(())
}

fn boolean(b: bool) -> ScmResult<Value> {
    Ok(Value::from(b))
}

// =============================================================================
// Rock throwing
// =============================================================================

/// Suzy and Billy both throw; Suzy's rock arrives first.
///
/// `suzy_hits = suzy_throws`, `billy_hits = billy_throws AND NOT suzy_hits`,
/// `bottle_shatters = suzy_hits OR billy_hits`.
pub fn rock_throwing() -> StructuralCausalModel {
    rock_throwing_seeded(FIXTURE_SEED)
}

pub fn rock_throwing_seeded(seed: u64) -> StructuralCausalModel {
    build("rock_throwing", seed, |m| {
        coin_roots(m, &["suzy_throws", "billy_throws"])?;
        m.add_variables([
            Variable::boolean("suzy_hits"),
            Variable::boolean("billy_hits"),
            Variable::boolean("bottle_shatters"),
        ])?;
        m.set_structural_function(
            "suzy_hits",
            StructuralFunction::new(["suzy_throws"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(p.truthy("suzy_throws")?)
            }),
        )?;
        m.set_structural_function(
            "billy_hits",
            StructuralFunction::new(
                ["billy_throws", "suzy_hits"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    boolean(p.truthy("billy_throws")? && !p.truthy("suzy_hits")?)
                },
            ),
        )?;
        m.set_structural_function(
            "bottle_shatters",
            StructuralFunction::new(
                ["suzy_hits", "billy_hits"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    boolean(p.truthy("suzy_hits")? || p.truthy("billy_hits")?)
                },
            ),
        )
    })
}

/// The observed rock-throwing world: both throw, Suzy's rock hits.
pub fn rock_throwing_state() -> Assignment {
    counterfact_core::assignment([
        ("suzy_throws", 1),
        ("billy_throws", 1),
        ("suzy_hits", 1),
        ("billy_hits", 0),
        ("bottle_shatters", 1),
    ])
}

// =============================================================================
// Mover 1D
// =============================================================================

/// A mover on a line steps right unless the obstacle is in the next cell.
///
/// `next_mover_pos = mover + 1` if `obstacle != mover + 1`, else `mover`.
pub fn mover_1d(world_length: i64) -> StructuralCausalModel {
    build("mover_1d", FIXTURE_SEED, |m| {
        m.add_variables([
            Variable::integer("mover", 0, world_length - 1)?,
            Variable::integer("obstacle", 0, world_length)?,
            Variable::integer("next_mover_pos", 0, world_length)?,
        ])?;
        m.set_structural_function(
            "mover",
            StructuralFunction::exogenous(NoiseDistribution::uniform_int(0, world_length - 2)),
        )?;
        m.set_structural_function(
            "obstacle",
            StructuralFunction::exogenous(NoiseDistribution::uniform_int(0, world_length - 1)),
        )?;
        m.set_structural_function(
            "next_mover_pos",
            StructuralFunction::new(
                ["mover", "obstacle"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    let mover = p.int("mover")?;
                    let obstacle = p.int("obstacle")?;
                    Ok(Value::Int(if obstacle != mover + 1 { mover + 1 } else { mover }))
                },
            ),
        )
    })
}

// =============================================================================
// Forest fire
// =============================================================================

/// Either lightning or arson suffices for fire.
pub fn forest_fire_disjunctive() -> StructuralCausalModel {
    build("forest_fire_disjunctive", FIXTURE_SEED, |m| {
        coin_roots(m, &["lightning", "arson"])?;
        m.insert_variable(Variable::boolean("fire"))?;
        m.set_structural_function(
            "fire",
            StructuralFunction::new(["lightning", "arson"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(p.truthy("lightning")? || p.truthy("arson")?)
            }),
        )
    })
}

/// Fire needs both lightning and arson.
pub fn forest_fire_conjunctive() -> StructuralCausalModel {
    build("forest_fire_conjunctive", FIXTURE_SEED, |m| {
        coin_roots(m, &["lightning", "arson"])?;
        m.insert_variable(Variable::boolean("fire"))?;
        m.set_structural_function(
            "fire",
            StructuralFunction::new(["lightning", "arson"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(p.truthy("lightning")? && p.truthy("arson")?)
            }),
        )
    })
}

/// April showers delay a May fire to June.
///
/// `fire_in_may = may_storm AND NOT april_showers`,
/// `fire_in_june = june_storm AND (april_showers OR NOT may_storm)`.
pub fn forest_fire_rain_storm() -> StructuralCausalModel {
    build("forest_fire_rain_storm", FIXTURE_SEED, |m| {
        coin_roots(m, &["april_showers", "may_storm", "june_storm"])?;
        m.add_variables([Variable::boolean("fire_in_may"), Variable::boolean("fire_in_june")])?;
        m.set_structural_function(
            "fire_in_may",
            StructuralFunction::new(
                ["may_storm", "april_showers"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    boolean(p.truthy("may_storm")? && !p.truthy("april_showers")?)
                },
            ),
        )?;
        m.set_structural_function(
            "fire_in_june",
            StructuralFunction::new(
                ["june_storm", "april_showers", "may_storm"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    boolean(
                        p.truthy("june_storm")?
                            && (p.truthy("april_showers")? || !p.truthy("may_storm")?),
                    )
                },
            ),
        )
    })
}

// =============================================================================
// Voting
// =============================================================================

/// Names of the voters in [`voting`].
pub fn voter_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("voter_{i}")).collect()
}

/// `n` voters; the motion wins with at least half the votes.
pub fn voting(n: usize) -> StructuralCausalModel {
    build("voting", FIXTURE_SEED, |m| {
        let voters = voter_names(n);
        let refs: Vec<&str> = voters.iter().map(String::as_str).collect();
        coin_roots(m, &refs)?;
        m.insert_variable(Variable::boolean("winner"))?;
        let total = n as i64;
        m.set_structural_function(
            "winner",
            StructuralFunction::new(voters.clone(), move |p: &ParentValues<'_>, _: Option<&Value>| {
                let mut yes = 0i64;
                for voter in p.names() {
                    yes += i64::from(p.truthy(voter)?);
                }
                boolean(2 * yes >= total)
            }),
        )
    })
}

// =============================================================================
// Railroad
// =============================================================================

/// A train reaches the station unless the engine breaks down; the track
/// switch only picks which track it runs on.
pub fn railroad() -> StructuralCausalModel {
    build("railroad", FIXTURE_SEED, |m| {
        coin_roots(m, &["breakdown", "track_switcher"])?;
        m.add_variables([
            Variable::discrete("on_track", vec![0.into(), 1.into(), 2.into()])?,
            Variable::boolean("arrived"),
        ])?;
        m.set_structural_function(
            "on_track",
            StructuralFunction::new(
                ["breakdown", "track_switcher"],
                |p: &ParentValues<'_>, _: Option<&Value>| {
                    if p.truthy("breakdown")? {
                        Ok(Value::Int(2))
                    } else {
                        p.get("track_switcher").cloned()
                    }
                },
            ),
        )?;
        m.set_structural_function(
            "arrived",
            StructuralFunction::new(["breakdown"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(!p.truthy("breakdown")?)
            }),
        )
    })
}

// =============================================================================
// Obedient gang
// =============================================================================

/// A leader and `n` members who copy the leader; any shot kills.
pub fn obedient_gang(n: usize) -> StructuralCausalModel {
    build("obedient_gang", FIXTURE_SEED, |m| {
        coin_roots(m, &["leader"])?;
        let members: Vec<String> = (0..n).map(|i| format!("gang_member_{i}")).collect();
        for member in &members {
            m.insert_variable(Variable::boolean(member.as_str()))?;
            m.set_structural_function(
                member,
                StructuralFunction::new(["leader"], |p: &ParentValues<'_>, _: Option<&Value>| {
                    p.get("leader").cloned()
                }),
            )?;
        }
        m.insert_variable(Variable::boolean("death"))?;
        let mut shooters = members;
        shooters.push("leader".to_string());
        m.set_structural_function(
            "death",
            StructuralFunction::new(shooters, |p: &ParentValues<'_>, _: Option<&Value>| {
                let mut any = false;
                for shooter in p.names() {
                    any |= p.truthy(shooter)?;
                }
                boolean(any)
            }),
        )
    })
}

// =============================================================================
// Halt or charge
// =============================================================================

/// The corporal follows the major unless the major abstains (2), in which
/// case the corporal follows the sergeant.
pub fn halt_or_charge() -> StructuralCausalModel {
    build("halt_or_charge", FIXTURE_SEED, |m| {
        m.add_variables([
            Variable::integer("major", 0, 2)?,
            Variable::boolean("sergeant"),
            Variable::integer("corporal", 0, 2)?,
        ])?;
        m.set_structural_function(
            "major",
            StructuralFunction::exogenous(NoiseDistribution::uniform_int(0, 2)),
        )?;
        m.set_structural_function(
            "sergeant",
            StructuralFunction::exogenous(NoiseDistribution::coin()),
        )?;
        m.set_structural_function(
            "corporal",
            StructuralFunction::new(["major", "sergeant"], |p: &ParentValues<'_>, _: Option<&Value>| {
                if p.int("major")? == 2 {
                    p.get("sergeant").cloned()
                } else {
                    p.get("major").cloned()
                }
            }),
        )
    })
}

// =============================================================================
// Queen of England
// =============================================================================

/// The flowers live if the gardener waters them or the queen does (1).
/// The queen may also actively refuse (-1).
pub fn queen_of_england() -> StructuralCausalModel {
    build("queen_of_england", FIXTURE_SEED, |m| {
        let queen_values: Vec<Value> = vec![(-1).into(), 0.into(), 1.into()];
        m.add_variables([
            Variable::discrete("queen", queen_values.clone())?,
            Variable::boolean("gardener"),
            Variable::boolean("flowers_live"),
        ])?;
        m.set_structural_function(
            "queen",
            StructuralFunction::exogenous(NoiseDistribution::choice(queen_values)),
        )?;
        m.set_structural_function(
            "gardener",
            StructuralFunction::exogenous(NoiseDistribution::coin()),
        )?;
        m.set_structural_function(
            "flowers_live",
            StructuralFunction::new(["gardener", "queen"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(p.truthy("gardener")? || p.int("queen")? == 1)
            }),
        )
    })
}

// =============================================================================
// Binary gates
// =============================================================================

fn binary_gate<F>(name: &str, gate: F) -> StructuralCausalModel
where
    F: Fn(bool, bool) -> bool + Send + Sync + 'static,
{
    build(name, FIXTURE_SEED, |m| {
        coin_roots(m, &["a", "b"])?;
        m.insert_variable(Variable::boolean("y"))?;
        m.set_structural_function(
            "y",
            StructuralFunction::new(["a", "b"], move |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(gate(p.truthy("a")?, p.truthy("b")?))
            }),
        )
    })
}

pub fn binary_and() -> StructuralCausalModel {
    binary_gate("binary_and", |a, b| a && b)
}

pub fn binary_or() -> StructuralCausalModel {
    binary_gate("binary_or", |a, b| a || b)
}

pub fn binary_xor() -> StructuralCausalModel {
    binary_gate("binary_xor", |a, b| a != b)
}

/// A root whose noise is continuous, for exercising enumeration guards.
pub fn float_root() -> StructuralCausalModel {
    build("float_root", FIXTURE_SEED, |m| {
        m.add_variables([Variable::float("temperature", 0.0, 1.0)?, Variable::boolean("hot")])?;
        m.set_structural_function(
            "temperature",
            StructuralFunction::exogenous(NoiseDistribution::UniformFloat { low: 0.0, high: 1.0 }),
        )?;
        m.set_structural_function(
            "hot",
            StructuralFunction::new(["temperature"], |p: &ParentValues<'_>, _: Option<&Value>| {
                boolean(p.float("temperature")? > 0.5)
            }),
        )
    })
}
