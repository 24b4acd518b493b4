use std::f32::consts::{PI, TAU};

use glam::f32::Vec2;
use rand::Rng;

use crate::{
    color::{random_color, Hsv},
    math_helpers::{
        damp_vec, hue_to_unit, normalize_or_none, unit_to_hue, wrap, COINCIDENT_EPSILON,
    },
    options::{FlockOptions, SimulationParams, WorldSize},
};

// Basic rules of Boids
//    separation: steer to avoid crowding local flockmates
//    alignment: steer towards the average heading of local flockmates
//    cohesion: steer to move towards the average position (center of mass) of local flockmates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    // sequential id starting from 0
    pub id: usize,
    pub position: Vec2,
    /// unit vector the boid is facing and moving along
    pub heading: Vec2,
    base_color: Hsv,
    pub current_color: Hsv,
}

impl Boid {
    /// Creates a [`Boid`] somewhere in `world`, facing a random direction,
    /// with a random hue.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        id: usize,
        world: &WorldSize,
        options: &FlockOptions,
    ) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let heading = Vec2::new(angle.cos(), angle.sin());

        // x in [0, width), y in [0, height)
        let x = rng.gen::<f32>() * world.width;
        let y = rng.gen::<f32>() * world.height;

        let base_color = random_color(rng, options.color_saturation, options.color_value);

        Boid {
            id,
            position: Vec2::new(x, y),
            heading,
            base_color,
            current_color: base_color,
        }
    }

    /// Creates a [`Boid`] at a known place. The heading gets normalised, a
    /// zero heading is kept as is and rejected by
    /// [`Flock::from_boids`](crate::flock::Flock::from_boids).
    pub fn with_state(
        id: usize,
        position: Vec2,
        heading: Vec2,
        hue: f32,
        options: &FlockOptions,
    ) -> Self {
        let base_color = Hsv::new(
            hue.rem_euclid(360.),
            options.color_saturation,
            options.color_value,
        );

        Boid {
            id,
            position,
            heading: normalize_or_none(heading).unwrap_or(Vec2::ZERO),
            base_color,
            current_color: base_color,
        }
    }

    pub fn base_color(&self) -> Hsv {
        self.base_color
    }

    /// Whether `point` lies inside the forward facing visibility cone.
    ///
    /// Maps the angle between heading and the direction to `point` onto
    /// `[0, 1]`, 0 being straight ahead and 1 straight behind, and compares
    /// it against `cone_of_vision / π`. A point on top of the boid has no
    /// direction and is never visible.
    pub fn is_visible(&self, point: Vec2, cone_of_vision: f32) -> bool {
        let to_point = match normalize_or_none(point - self.position) {
            Some(direction) => direction,
            None => return false,
        };

        let dot_mapped = (-to_point.dot(self.heading) + 1.) / 2.;
        dot_mapped < cone_of_vision / PI
    }

    /// Narrows `others` down to the boids inside the visibility cone.
    pub fn filter_sight<'a>(&self, others: &[&'a Boid], options: &FlockOptions) -> Vec<&'a Boid> {
        others
            .iter()
            .filter(|b_other| {
                self.id != b_other.id && self.is_visible(b_other.position, options.cone_of_vision)
            })
            .copied()
            .collect()
    }

    /// Combines the three steering rules into the heading this boid wants to
    /// turn to. Rules without qualifying neighbours are left out; if nothing
    /// is left the current heading is returned.
    ///
    /// Expects a unit heading. A boid built by [`Boid::with_state`] from a
    /// zero heading has `Vec2::ZERO` and gets it straight back when it has
    /// no neighbours; [`Flock::from_boids`](crate::flock::Flock::from_boids)
    /// refuses such boids.
    pub fn run_rules(
        &self,
        neighbours: &[&Boid],
        options: &FlockOptions,
        params: &SimulationParams,
    ) -> Vec2 {
        let visible = if options.field_of_vision_on {
            self.filter_sight(neighbours, options)
        } else {
            neighbours.to_vec()
        };

        let mut sum = self.heading;

        if let Some(cohesion) = self.cohesion(&visible, options) {
            sum += cohesion * params.cohesion_weight;
        }

        if let Some(alignment) = self.alignment(&visible, options) {
            sum += alignment * params.alignment_weight;
        }

        if let Some(separation) = self.separation(&visible, options) {
            sum += separation * params.separation_weight;
        }

        normalize_or_none(sum).unwrap_or(self.heading)
    }

    /// Direction towards the centre of mass of the boids within sight.
    pub fn cohesion(&self, others: &[&Boid], options: &FlockOptions) -> Option<Vec2> {
        let mut center = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            if self.position.distance(other.position) < options.sight_radius {
                center += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        center /= count as f32;
        normalize_or_none(center - self.position)
    }

    /// Average heading of the boids within sight, normalised.
    pub fn alignment(&self, others: &[&Boid], options: &FlockOptions) -> Option<Vec2> {
        let mut avg = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            if self.position.distance(other.position) < options.sight_radius {
                avg += other.heading;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        normalize_or_none(avg / count as f32)
    }

    /// Normalised [`Boid::separation_force`].
    pub fn separation(&self, others: &[&Boid], options: &FlockOptions) -> Option<Vec2> {
        self.separation_force(others, options).and_then(normalize_or_none)
    }

    /// Average push away from every boid closer than the separation radius.
    ///
    /// Each push is a unit vector scaled by `(1 - distance / radius)²`, so
    /// closer boids push a lot harder. Coincident boids give no direction and
    /// are skipped.
    pub fn separation_force(&self, others: &[&Boid], options: &FlockOptions) -> Option<Vec2> {
        let mut res = Vec2::ZERO;
        let mut count = 0;

        for other in others {
            let distance = self.position.distance(other.position);
            if distance < options.separation_radius && distance > COINCIDENT_EPSILON {
                if let Some(away) = normalize_or_none(self.position - other.position) {
                    res += away * Self::sep_scale(distance, options);
                    count += 1;
                }
            }
        }

        if count > 0 {
            Some(res / count as f32)
        } else {
            None
        }
    }

    fn sep_scale(distance: f32, options: &FlockOptions) -> f32 {
        (1. - distance / options.separation_radius).powi(2)
    }

    /// Blends this boid's hue with everyone around it.
    ///
    /// Hues are summed as unit vectors on the hue circle, starting with the
    /// boid's own base hue and its current hue, so blending works across the
    /// 0°/360° seam. No cone here, only the sight radius. If the vectors
    /// cancel out the current colour is kept.
    pub fn local_color(&self, neighbours: &[&Boid], options: &FlockOptions) -> Hsv {
        let mut hue_vector =
            hue_to_unit(self.base_color.hue) + hue_to_unit(self.current_color.hue);

        for other in neighbours {
            if self.id != other.id && self.position.distance(other.position) < options.sight_radius
            {
                hue_vector += hue_to_unit(other.current_color.hue);
            }
        }

        match unit_to_hue(hue_vector) {
            Some(hue) => self.base_color.with_hue(hue),
            None => self.current_color,
        }
    }

    /// Turns the heading towards `target`, independent of frame rate.
    pub fn steer(&mut self, target: Vec2, delta_time: f32, options: &FlockOptions) {
        let damped = damp_vec(self.heading, target, options.smoothing, delta_time);

        if let Some(heading) = normalize_or_none(damped) {
            self.heading = heading;
        }
    }

    // Actually shifts the individual's location
    pub fn update_location(&mut self, delta_time: f32, world: &WorldSize, options: &FlockOptions) {
        self.position += self.heading * options.boid_speed * delta_time;
        self.boundaries(world, options);
    }

    fn boundaries(&mut self, world: &WorldSize, options: &FlockOptions) {
        let pad = options.wrap_padding;
        self.position.x = wrap(self.position.x, -pad, world.width + pad);
        self.position.y = wrap(self.position.y, -pad, world.height + pad);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use approx::assert_relative_eq;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rstest::rstest;

    use super::Boid;
    use crate::options::{FlockOptions, SimulationParams, WorldSize};

    fn boid_at(id: usize, x: f32, y: f32, heading: Vec2) -> Boid {
        Boid::with_state(id, Vec2::new(x, y), heading, 0., &FlockOptions::default())
    }

    #[test]
    fn zero_heading_comes_back_from_lonely_run_rules() {
        let boid = boid_at(0, 10., 10., Vec2::ZERO);
        let target = boid.run_rules(&[], &FlockOptions::default(), &SimulationParams::default());

        assert_eq!(boid.heading, Vec2::ZERO);
        assert_eq!(target, Vec2::ZERO);
    }

    #[test]
    fn new_boid_is_inside_world_and_facing_somewhere() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let world = WorldSize::new(300., 200.).unwrap();
        let options = FlockOptions::default();

        for id in 0..500 {
            let boid = Boid::new(&mut rng, id, &world, &options);
            assert!((0.0..300.0).contains(&boid.position.x));
            assert!((0.0..200.0).contains(&boid.position.y));
            assert_relative_eq!(boid.heading.length(), 1., epsilon = 1e-5);
            assert_eq!(boid.base_color(), boid.current_color);
            assert_eq!(boid.base_color().saturation, 0.8);
            assert_eq!(boid.base_color().value, 0.7);
        }
    }

    #[rstest]
    #[case::ahead(0., true)]
    #[case::side(90., true)]
    #[case::wide(120., true)]
    #[case::behind_edge(135., false)]
    #[case::behind(180., false)]
    #[case::other_side(-120., true)]
    fn visibility_cone(#[case] degrees: f32, #[case] expected: bool) {
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let angle = degrees / 180. * PI;
        let point = Vec2::new(angle.cos(), angle.sin()) * 10.;

        assert_eq!(boid.is_visible(point, PI * 0.8), expected);
    }

    #[test]
    fn directly_behind_is_exactly_the_excluded_boundary() {
        // cos_term for a point straight behind is 1, and 1 < 1 does not hold
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        assert!(!boid.is_visible(Vec2::new(-10., 0.), PI));
        assert!(!boid.is_visible(Vec2::new(-10., 0.), PI * 0.8));
    }

    #[test]
    fn coincident_point_is_not_visible() {
        let boid = boid_at(0, 5., 5., Vec2::new(1., 0.));
        assert!(!boid.is_visible(Vec2::new(5., 5.), PI));
    }

    #[rstest]
    #[case(5., 10.)]
    #[case(10., 30.)]
    #[case(20., 45.)]
    #[case(1., 49.)]
    fn separation_falls_off_with_distance(#[case] near: f32, #[case] far: f32) {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let close = boid_at(1, near, 0., Vec2::new(1., 0.));
        let distant = boid_at(1, far, 0., Vec2::new(1., 0.));

        let strong = boid.separation_force(&[&close], &options).unwrap();
        let weak = boid.separation_force(&[&distant], &options).unwrap();

        assert!(strong.length() > weak.length());
        // pushes away from the neighbour
        assert!(strong.x < 0.);
    }

    #[test]
    fn separation_weight_is_quadratic() {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let other = boid_at(1, 10., 0., Vec2::new(1., 0.));

        let force = boid.separation_force(&[&other], &options).unwrap();
        assert_relative_eq!(force.length(), 0.64, epsilon = 1e-5);
    }

    #[test]
    fn separation_ignores_coincident_and_far_boids() {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let on_top = boid_at(1, 0., 0., Vec2::new(1., 0.));
        let far = boid_at(2, 60., 0., Vec2::new(1., 0.));

        assert_eq!(boid.separation_force(&[&on_top, &far], &options), None);
        assert_eq!(boid.separation(&[], &options), None);
    }

    #[test]
    fn cohesion_points_to_centre_of_mass() {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let a = boid_at(1, 20., 10., Vec2::new(1., 0.));
        let b = boid_at(2, 20., -10., Vec2::new(1., 0.));

        let cohesion = boid.cohesion(&[&a, &b], &options).unwrap();
        assert_relative_eq!(cohesion.x, 1., epsilon = 1e-5);
        assert_relative_eq!(cohesion.y, 0., epsilon = 1e-5);
    }

    #[test]
    fn alignment_of_opposite_headings_has_no_direction() {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let up = boid_at(1, 10., 0., Vec2::new(0., 1.));
        let down = boid_at(2, 10., 1., Vec2::new(0., -1.));

        assert_eq!(boid.alignment(&[&up, &down], &options), None);
    }

    #[test]
    fn lonely_boid_keeps_its_heading() {
        let heading = Vec2::new(0.6, 0.8);
        let boid = boid_at(0, 0., 0., heading);
        let target = boid.run_rules(&[], &FlockOptions::default(), &SimulationParams::default());

        assert_relative_eq!(target.x, heading.x, epsilon = 1e-6);
        assert_relative_eq!(target.y, heading.y, epsilon = 1e-6);
    }

    #[test]
    fn cone_filters_out_boids_behind() {
        let options = FlockOptions::default();
        let boid = boid_at(0, 0., 0., Vec2::new(1., 0.));
        let ahead = boid_at(1, 10., 0., Vec2::new(1., 0.));
        let behind = boid_at(2, -10., 0., Vec2::new(1., 0.));

        let visible = boid.filter_sight(&[&ahead, &behind, &boid], &options);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn hue_blends_within_neighbour_arc() {
        let options = FlockOptions::default();
        let boid = Boid::with_state(0, Vec2::ZERO, Vec2::new(1., 0.), 10., &options);
        let a = Boid::with_state(1, Vec2::new(10., 0.), Vec2::new(1., 0.), 20., &options);
        let b = Boid::with_state(2, Vec2::new(0., 10.), Vec2::new(1., 0.), 30., &options);

        let color = boid.local_color(&[&a, &b], &options);

        assert_relative_eq!(color.hue, 17.5, epsilon = 0.1);
        assert_eq!(color.saturation, 0.8);
        assert_eq!(color.value, 0.7);
    }

    #[test]
    fn hue_blends_across_the_seam() {
        let options = FlockOptions::default();
        let boid = Boid::with_state(0, Vec2::ZERO, Vec2::new(1., 0.), 350., &options);
        let other = Boid::with_state(1, Vec2::new(10., 0.), Vec2::new(1., 0.), 20., &options);

        let hue = boid.local_color(&[&other], &options).hue;
        assert!(hue > 350. || hue < 20., "got {hue}");
    }

    #[test]
    fn zero_time_step_does_not_move_or_turn() {
        let options = FlockOptions::default();
        let world = WorldSize::new(100., 100.).unwrap();
        let mut boid = boid_at(0, 50., 50., Vec2::new(1., 0.));

        boid.steer(Vec2::new(0., 1.), 0., &options);
        boid.update_location(0., &world, &options);

        assert_eq!(boid.position, Vec2::new(50., 50.));
        assert_eq!(boid.heading, Vec2::new(1., 0.));
    }

    #[test]
    fn moves_along_heading_and_wraps() {
        let options = FlockOptions::default();
        let world = WorldSize::new(100., 100.).unwrap();
        let mut boid = boid_at(0, 105., 50., Vec2::new(1., 0.));

        // 85 units/s for a tenth of a second
        boid.update_location(0.1, &world, &options);

        assert_relative_eq!(boid.position.x, -6.5, epsilon = 1e-3);
        assert_relative_eq!(boid.position.y, 50., epsilon = 1e-5);
    }
}
