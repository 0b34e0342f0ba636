//! Best-scene selection by footprint overlap.
//!
//! Candidates are compared through a single preference relation:
//!
//! 1. larger intersection area with the target wins;
//! 2. on an exactly equal area, lower cloud cover wins;
//! 3. on an exact tie of both, the earlier candidate is kept.
//!
//! A NaN area ranks below every number and a NaN cloud cover ranks above
//! every number, so the relation stays a total preorder on any input.

use std::cmp::Ordering;
use verdex_core::{BoundingBox, Error, Result, Scene};

/// A candidate scene together with its overlap with the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredScene<'a> {
    pub scene: &'a Scene,
    /// Intersection area with the target, in squared bbox units (>= 0).
    pub overlap_area: f64,
    /// Position of the scene in the candidate sequence.
    pub index: usize,
}

/// Outcome of [`select_best_scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneSelection<'a> {
    /// The winning candidate.
    Best(ScoredScene<'a>),
    /// The candidate sequence was empty.
    NoMatch,
}

impl<'a> SceneSelection<'a> {
    /// The selected scene, if any.
    pub fn scene(&self) -> Option<&'a Scene> {
        match self {
            SceneSelection::Best(scored) => Some(scored.scene),
            SceneSelection::NoMatch => None,
        }
    }

    /// Overlap area of the selected scene, if any.
    pub fn overlap_area(&self) -> Option<f64> {
        match self {
            SceneSelection::Best(scored) => Some(scored.overlap_area),
            SceneSelection::NoMatch => None,
        }
    }
}

/// Intersection area between the target and a scene footprint.
///
/// Both boxes are validated first; disjoint or edge-touching boxes give 0.
pub fn overlap_area(target: &BoundingBox, scene: &Scene) -> Result<f64> {
    target.validate()?;
    scene.bbox.validate()?;
    Ok(target.intersection_area(&scene.bbox))
}

/// Select the candidate that best covers `target`.
///
/// The fold runs in input order: the first candidate seeds the running best
/// and a later one replaces it only when strictly preferred. `NoMatch` is
/// returned only for an empty sequence; a lone candidate with zero overlap is
/// still selected.
///
/// # Errors
///
/// [`verdex_core::Error::InvalidBoundingBox`] if the target or any candidate
/// box is malformed.
pub fn select_best_scene<'a, I>(target: &BoundingBox, candidates: I) -> Result<SceneSelection<'a>>
where
    I: IntoIterator<Item = &'a Scene>,
{
    target.validate()?;

    let best = score(target, candidates).try_fold(None, |best, candidate| {
        let candidate = candidate?;
        Ok::<_, Error>(match best {
            Some(current) if preference(&candidate, &current) != Ordering::Greater => {
                Some(current)
            }
            _ => Some(candidate),
        })
    })?;

    Ok(best.map_or(SceneSelection::NoMatch, SceneSelection::Best))
}

/// Score every candidate against `target` and order them best first.
///
/// The ordering is stable and uses the same preference as
/// [`select_best_scene`], so the first element is always the scene it picks.
pub fn rank_scenes<'a, I>(target: &BoundingBox, candidates: I) -> Result<Vec<ScoredScene<'a>>>
where
    I: IntoIterator<Item = &'a Scene>,
{
    target.validate()?;

    let mut ranked = score(target, candidates).collect::<Result<Vec<_>>>()?;
    ranked.sort_by(|a, b| preference(b, a));
    Ok(ranked)
}

fn score<'a, I>(
    target: &BoundingBox,
    candidates: I,
) -> impl Iterator<Item = Result<ScoredScene<'a>>>
where
    I: IntoIterator<Item = &'a Scene>,
{
    let target = *target;
    candidates
        .into_iter()
        .enumerate()
        .map(move |(index, scene)| {
            scene.bbox.validate()?;
            Ok(ScoredScene {
                scene,
                overlap_area: target.intersection_area(&scene.bbox),
                index,
            })
        })
}

/// `Greater` when `a` is preferred over `b`.
fn preference(a: &ScoredScene<'_>, b: &ScoredScene<'_>) -> Ordering {
    nan_low(a.overlap_area, b.overlap_area)
        .then_with(|| nan_high(b.scene.cloud_cover, a.scene.cloud_cover))
}

/// Total order with NaN below every number.
fn nan_low(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Total order with NaN above every number.
fn nan_high(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scene(id: &str, bbox: [f64; 4], cloud: f64) -> Scene {
        let acquired = Utc.with_ymd_and_hms(2024, 7, 1, 11, 0, 0).unwrap();
        Scene::new(id, BoundingBox::from_slice(&bbox).unwrap(), cloud, acquired)
    }

    fn target() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn test_larger_overlap_wins() {
        let scenes = [
            scene("s1", [5.0, 5.0, 15.0, 15.0], 10.0),
            scene("s2", [0.0, 0.0, 10.0, 10.0], 20.0),
        ];
        let picked = select_best_scene(&target(), &scenes).unwrap();

        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("s2"));
        assert_eq!(picked.overlap_area(), Some(100.0));
    }

    #[test]
    fn test_cloud_cover_breaks_area_tie() {
        let scenes = [
            scene("cloudy", [0.0, 0.0, 10.0, 10.0], 30.0),
            scene("clear", [0.0, 0.0, 10.0, 10.0], 12.0),
        ];
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("clear"));
    }

    #[test]
    fn test_exact_tie_keeps_first() {
        let scenes = [
            scene("first", [0.0, 0.0, 10.0, 10.0], 5.0),
            scene("second", [-5.0, -5.0, 20.0, 20.0], 5.0),
        ];
        match select_best_scene(&target(), &scenes).unwrap() {
            SceneSelection::Best(scored) => {
                assert_eq!(scored.scene.id, "first");
                assert_eq!(scored.index, 0);
            }
            SceneSelection::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn test_area_dominates_cloud_cover() {
        let scenes = [
            scene("clear_partial", [5.0, 0.0, 15.0, 10.0], 0.0),
            scene("cloudy_full", [0.0, 0.0, 10.0, 10.0], 99.0),
        ];
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("cloudy_full"));
    }

    #[test]
    fn test_empty_candidates() {
        let scenes: Vec<Scene> = Vec::new();
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked, SceneSelection::NoMatch);
        assert_eq!(picked.scene(), None);
    }

    #[test]
    fn test_single_disjoint_candidate_is_selected() {
        let scenes = [scene("far", [50.0, 50.0, 60.0, 60.0], 1.0)];
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("far"));
        assert_eq!(picked.overlap_area(), Some(0.0));
    }

    #[test]
    fn test_disjoint_never_beats_overlap() {
        let scenes = [
            scene("far", [50.0, 50.0, 60.0, 60.0], 0.0),
            scene("sliver", [9.0, 9.0, 11.0, 11.0], 80.0),
        ];
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("sliver"));
    }

    #[test]
    fn test_invalid_target() {
        let bad = BoundingBox {
            min_x: 10.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 10.0,
        };
        let scenes = [scene("s1", [0.0, 0.0, 1.0, 1.0], 0.0)];
        assert!(matches!(
            select_best_scene(&bad, &scenes),
            Err(Error::InvalidBoundingBox { .. })
        ));
        assert!(matches!(
            rank_scenes(&bad, &scenes),
            Err(Error::InvalidBoundingBox { .. })
        ));
    }

    #[test]
    fn test_invalid_candidate() {
        let mut broken = scene("broken", [0.0, 0.0, 1.0, 1.0], 0.0);
        broken.bbox.max_y = -3.0;
        let scenes = [scene("ok", [0.0, 0.0, 10.0, 10.0], 0.0), broken];

        assert!(matches!(
            select_best_scene(&target(), &scenes),
            Err(Error::InvalidBoundingBox { .. })
        ));
        assert!(overlap_area(&target(), &scenes[1]).is_err());
    }

    #[test]
    fn test_nan_cloud_cover_ranks_last() {
        let scenes = [
            scene("unknown", [0.0, 0.0, 10.0, 10.0], f64::NAN),
            scene("known", [0.0, 0.0, 10.0, 10.0], 90.0),
        ];
        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("known"));

        let reversed = [scenes[1].clone(), scenes[0].clone()];
        let picked = select_best_scene(&target(), &reversed).unwrap();
        assert_eq!(picked.scene().map(|s| s.id.as_str()), Some("known"));

        let ranked = rank_scenes(&target(), &reversed).unwrap();
        assert_eq!(ranked[1].scene.id, "unknown");
    }

    #[test]
    fn test_nan_orderings() {
        assert_eq!(nan_low(f64::NAN, 0.0), Ordering::Less);
        assert_eq!(nan_low(0.0, f64::NAN), Ordering::Greater);
        assert_eq!(nan_high(f64::NAN, 100.0), Ordering::Greater);
        assert_eq!(nan_high(100.0, f64::NAN), Ordering::Less);
        assert_eq!(nan_high(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_rank_orders_by_preference() {
        let scenes = [
            scene("quarter", [5.0, 5.0, 15.0, 15.0], 10.0),
            scene("full_cloudy", [0.0, 0.0, 10.0, 10.0], 40.0),
            scene("none", [20.0, 20.0, 30.0, 30.0], 0.0),
            scene("full_clear", [0.0, 0.0, 10.0, 10.0], 5.0),
            scene("quarter_again", [-5.0, -5.0, 5.0, 5.0], 10.0),
        ];
        let ranked = rank_scenes(&target(), &scenes).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|s| s.scene.id.as_str()).collect();

        assert_eq!(
            ids,
            ["full_clear", "full_cloudy", "quarter", "quarter_again", "none"]
        );
        assert_eq!(ranked[2].overlap_area, 25.0);
        assert_eq!(ranked[4].index, 2);

        let picked = select_best_scene(&target(), &scenes).unwrap();
        assert_eq!(picked, SceneSelection::Best(ranked[0]));
    }
}
