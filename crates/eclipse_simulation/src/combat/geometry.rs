//! Геометрия hit reaction: с какой стороны прилетел удар
//!
//! Система координат Bevy: right-handed, Y-up.
//! Signed angle: 0° = спереди, положительный = слева, отрицательный = справа.

use bevy::prelude::*;

/// Сторона попадания относительно forward актора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum HitDirection {
    Front,
    Left,
    Right,
    Back,
}

impl HitDirection {
    /// Секция hit react монтажа
    ///
    /// У удара в спину нет своей секции — используется "Dead" (падение вперёд).
    pub fn section(&self) -> &'static str {
        match self {
            HitDirection::Front => "FromFront",
            HitDirection::Left => "FromLeft",
            HitDirection::Right => "FromRight",
            HitDirection::Back => "Dead",
        }
    }
}

/// Signed угол (градусы) между forward актора и направлением на точку удара.
///
/// Точка удара опускается на высоту актора, acos даёт беззнаковый угол,
/// знак берётся из вертикальной (Y) компоненты cross product.
/// Вырожденный случай (удар в центр актора) → 0°.
pub fn hit_angle_degrees(forward: Vec3, position: Vec3, impact_point: Vec3) -> f32 {
    let impact_lowered = Vec3::new(impact_point.x, position.y, impact_point.z);
    let to_hit = (impact_lowered - position).normalize_or_zero();
    let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();

    if to_hit == Vec3::ZERO || forward == Vec3::ZERO {
        return 0.0;
    }

    // clamp: float погрешность может дать dot чуть > 1 → acos = NaN
    let cos_theta = forward.dot(to_hit).clamp(-1.0, 1.0);
    let theta = cos_theta.acos().to_degrees();

    if forward.cross(to_hit).y < 0.0 {
        -theta
    } else {
        theta
    }
}

/// Полуоткрытые интервалы: [-45,45) Front, [45,135) Left, [-135,-45) Right, иначе Back
pub fn classify_angle(theta: f32) -> HitDirection {
    if (-45.0..45.0).contains(&theta) {
        HitDirection::Front
    } else if (45.0..135.0).contains(&theta) {
        HitDirection::Left
    } else if (-135.0..-45.0).contains(&theta) {
        HitDirection::Right
    } else {
        HitDirection::Back
    }
}

pub fn classify_hit_direction(forward: Vec3, position: Vec3, impact_point: Vec3) -> HitDirection {
    classify_angle(hit_angle_degrees(forward, position, impact_point))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORWARD: Vec3 = Vec3::NEG_Z;

    /// Точка на расстоянии 100 под углом `degrees` от forward (положительный = влево)
    fn impact_at(degrees: f32) -> Vec3 {
        Quat::from_rotation_y(degrees.to_radians()) * FORWARD * 100.0
    }

    #[test]
    fn test_cardinal_directions() {
        let origin = Vec3::ZERO;
        assert_eq!(classify_hit_direction(FORWARD, origin, Vec3::new(0.0, 0.0, -50.0)), HitDirection::Front);
        assert_eq!(classify_hit_direction(FORWARD, origin, Vec3::new(50.0, 0.0, 0.0)), HitDirection::Right);
        assert_eq!(classify_hit_direction(FORWARD, origin, Vec3::new(-50.0, 0.0, 0.0)), HitDirection::Left);
        assert_eq!(classify_hit_direction(FORWARD, origin, Vec3::new(0.0, 0.0, 50.0)), HitDirection::Back);
    }

    #[test]
    fn test_sign_follows_side() {
        let right = hit_angle_degrees(FORWARD, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        let left = hit_angle_degrees(FORWARD, Vec3::ZERO, Vec3::new(-10.0, 0.0, 0.0));
        assert!((right + 90.0).abs() < 1e-3, "right = {}", right);
        assert!((left - 90.0).abs() < 1e-3, "left = {}", left);
    }

    #[test]
    fn test_vertical_offset_is_ignored() {
        // Удар сверху-спереди: высота не должна влиять
        let position = Vec3::new(0.0, 90.0, 0.0);
        let impact = Vec3::new(0.0, 180.0, -5.0);
        assert_eq!(classify_hit_direction(FORWARD, position, impact), HitDirection::Front);
    }

    #[test]
    fn test_front_band_sweep() {
        for degrees in -44..=44 {
            let direction = classify_hit_direction(FORWARD, Vec3::ZERO, impact_at(degrees as f32));
            assert_eq!(direction, HitDirection::Front, "angle {}", degrees);
        }
    }

    #[test]
    fn test_side_and_back_band_sweep() {
        for degrees in 46..=134 {
            assert_eq!(classify_hit_direction(FORWARD, Vec3::ZERO, impact_at(degrees as f32)), HitDirection::Left);
            assert_eq!(classify_hit_direction(FORWARD, Vec3::ZERO, impact_at(-degrees as f32)), HitDirection::Right);
        }
        for degrees in 136..=179 {
            assert_eq!(classify_hit_direction(FORWARD, Vec3::ZERO, impact_at(degrees as f32)), HitDirection::Back);
            assert_eq!(classify_hit_direction(FORWARD, Vec3::ZERO, impact_at(-degrees as f32)), HitDirection::Back);
        }
    }

    #[test]
    fn test_band_boundaries_are_half_open() {
        assert_eq!(classify_angle(-45.0), HitDirection::Front);
        assert_eq!(classify_angle(45.0), HitDirection::Left);
        assert_eq!(classify_angle(44.999), HitDirection::Front);
        assert_eq!(classify_angle(-45.001), HitDirection::Right);
        assert_eq!(classify_angle(135.0), HitDirection::Back);
        assert_eq!(classify_angle(-135.0), HitDirection::Right);
        assert_eq!(classify_angle(-135.001), HitDirection::Back);
        assert_eq!(classify_angle(180.0), HitDirection::Back);
        assert_eq!(classify_angle(-180.0), HitDirection::Back);
    }

    #[test]
    fn test_degenerate_impact_is_front() {
        let position = Vec3::new(5.0, 0.0, 5.0);
        assert_eq!(hit_angle_degrees(FORWARD, position, position), 0.0);
        assert_eq!(classify_hit_direction(FORWARD, position, position + Vec3::Y * 30.0), HitDirection::Front);
    }

    #[test]
    fn test_reaction_sections() {
        assert_eq!(HitDirection::Front.section(), "FromFront");
        assert_eq!(HitDirection::Back.section(), "Dead");
    }
}
