use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::ecolor::Hsva;
use eframe::egui::{Color32, Pos2, Rect};

pub const ROOT_DIRECTORY: &str = "root";
pub const OTHER_FEATURE: &str = "Other";

/// Directory a node lives in, inferred from its label alone.
///
/// `src/app/view.rs` yields `src/app`; a dotted name such as `pkg.module.func` yields
/// `pkg`; anything else lands in [`ROOT_DIRECTORY`].
pub fn infer_directory(label: &str) -> String {
    if label.contains('/') {
        let directory = label.rsplit_once('/').map(|(dir, _)| dir).unwrap_or_default();
        if directory.is_empty() {
            ROOT_DIRECTORY.to_owned()
        } else {
            directory.to_owned()
        }
    } else if let Some((first, _)) = label.split_once('.')
        && !first.is_empty()
    {
        first.to_owned()
    } else {
        ROOT_DIRECTORY.to_owned()
    }
}

/// Feature bucket used when a node has no usable feature context: the last segment of
/// its inferred directory.
pub fn feature_group(label: &str) -> String {
    let directory = infer_directory(label);
    if directory == ROOT_DIRECTORY {
        return OTHER_FEATURE.to_owned();
    }

    directory
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| OTHER_FEATURE.to_owned())
}

pub fn short_label(label: &str) -> &str {
    label.rsplit('/').next().unwrap_or(label)
}

fn stable_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

pub fn string_color(text: &str) -> Color32 {
    let hash = stable_hash(text);
    let hue = (hash % 360) as f32 / 360.0;
    let saturation = 0.45 + ((hash >> 16) % 20) as f32 / 100.0;
    let value = 0.70 + ((hash >> 32) % 15) as f32 / 100.0;
    Color32::from(Hsva::new(hue, saturation, value, 1.0))
}

pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Like `f32::clamp`, but collapses to the midpoint instead of panicking when the
/// range is inverted (a viewport narrower than both margins).
pub fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        return (min + max) * 0.5;
    }
    value.clamp(min, max)
}

pub fn labels_overlap(a: Rect, b: Rect, padding: f32) -> bool {
    !(a.right() + padding <= b.left()
        || b.right() + padding <= a.left()
        || a.bottom() + padding <= b.top()
        || b.bottom() + padding <= a.top())
}

pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return distance(point, start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    distance(point, start + segment * t)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn directory_is_inferred_from_paths_and_dotted_names() {
        assert_eq!(infer_directory("src/app/view.rs"), "src/app");
        assert_eq!(infer_directory("pkg.module.func"), "pkg");
        assert_eq!(infer_directory("main"), ROOT_DIRECTORY);
        assert_eq!(infer_directory("/top"), ROOT_DIRECTORY);
        assert_eq!(infer_directory(".hidden"), ROOT_DIRECTORY);
    }

    #[test]
    fn feature_group_uses_last_directory_segment() {
        assert_eq!(feature_group("src/billing/invoice.ts"), "billing");
        assert_eq!(feature_group("lonely"), OTHER_FEATURE);
    }

    #[test]
    fn colors_are_stable_per_string() {
        assert_eq!(string_color("billing"), string_color("billing"));
        assert_eq!(string_color("x").a(), 255);
    }

    #[test]
    fn inverted_clamp_range_collapses_to_midpoint() {
        assert_eq!(clamp_axis(5.0, 100.0, 50.0), 75.0);
        assert_eq!(clamp_axis(500.0, 100.0, 300.0), 300.0);
    }

    #[test]
    fn segment_distance_clamps_projection() {
        let start = pos2(0.0, 0.0);
        let end = pos2(100.0, 0.0);
        assert_eq!(distance_to_segment(pos2(50.0, 3.0), start, end), 3.0);
        assert_eq!(distance_to_segment(pos2(-4.0, 3.0), start, end), 5.0);
        assert_eq!(distance_to_segment(pos2(7.0, 0.0), start, start), 7.0);
    }

    #[test]
    fn overlap_respects_padding() {
        let a = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        let b = Rect::from_min_size(pos2(12.0, 0.0), vec2(10.0, 10.0));
        assert!(!labels_overlap(a, b, 0.0));
        assert!(labels_overlap(a, b, 4.0));
    }
}
