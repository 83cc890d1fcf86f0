//! Paint pass: turns the scene into one triangle list.
//!
//! Layers, bottom to top: backdrop, starfield, sun, planets (ascending draw
//! priority, each with its orbit lanes, debris, body, atmosphere and moons),
//! zodiac overlay. Wallpaper mode drops the backdrop and the starfield so the
//! desktop shows through.

use glam::Vec2;

use crate::api::types::Color;
use crate::components::moon::{Moon, MoonSurface};
use crate::components::planet::{OrbitDecoration, Planet, PlanetSurface};
use crate::components::sun::Sun;
use crate::core::scene::Scene;
use crate::renderer::camera::Camera;
use crate::systems::shapes::Shatter;
use crate::systems::starfield::{StarKind, Starfield};
use crate::systems::vector::VectorCanvas;
use crate::systems::zodiac::ZodiacSign;

const BACKDROP: Color = Color::rgb(0.0196, 0.0196, 0.0196);
const OCEAN_LIGHT: Color = Color::rgb(0.145, 0.145, 0.145);
const OCEAN_DARK: Color = Color::rgb(0.063, 0.063, 0.063);
const LAND: Color = Color::rgb(0.165, 0.165, 0.165);
const RUBBLE: Color = Color::rgb(0.169, 0.169, 0.169);
const OUTLINE: Color = Color::rgb(0.251, 0.251, 0.251);
const MOON_BODY: Color = Color::rgb(0.45, 0.45, 0.45);
const MOON_RUBBLE: Color = Color::rgb(0.2, 0.2, 0.2);
const MOON_SHARD: Color = Color::rgb(0.267, 0.267, 0.267);
const MOON_DUST: Color = Color::rgb(0.467, 0.467, 0.467);
const SUN_RING: Color = Color::rgb(0.19, 0.19, 0.19);
const LINK_TINT: Color = Color::rgb(0.784, 0.863, 1.0);

const ATMOSPHERE_FACTOR: f32 = 1.15;
const ATMOSPHERE_DASH: f32 = 15.0;
const ORBIT_LINE_WIDTH: f32 = 2.0;

/// Everything the paint pass reads.
pub struct PaintParams<'a> {
    pub scene: &'a Scene,
    pub starfield: &'a Starfield,
    pub camera: &'a Camera,
    pub accent: Color,
    pub wallpaper: bool,
    pub zodiac: Option<ZodiacSign>,
}

fn alpha8(color: Color, alpha: u8) -> Color {
    color.with_alpha(alpha as f32 / 255.0)
}

/// Tessellate one frame into `canvas` (cleared first).
pub fn paint_map(params: &PaintParams, canvas: &mut VectorCanvas) {
    canvas.clear();

    if !params.wallpaper {
        let view = params.camera.viewport();
        canvas.fill_rect(Vec2::new(view.left, view.top), view.width, view.height, BACKDROP);
        paint_starfield(params.starfield, canvas);
    }

    paint_sun(&params.scene.sun, params.accent, canvas);
    for planet in params.scene.draw_order() {
        paint_planet(planet, params.accent, canvas);
    }

    if let Some(sign) = params.zodiac {
        paint_zodiac(sign, params.camera, canvas);
    }
}

fn paint_starfield(starfield: &Starfield, canvas: &mut VectorCanvas) {
    for nebula in &starfield.nebulae {
        canvas.fill_radial_gradient(
            nebula.center,
            nebula.size * 0.5,
            nebula.rotation,
            &[(0.0, nebula.color), (1.0, nebula.color.with_alpha(0.0))],
        );
    }

    for link in &starfield.links {
        let (Some(a), Some(b)) = (starfield.stars.get(link.a), starfield.stars.get(link.b)) else {
            continue;
        };
        canvas.stroke_line(a.position, b.position, 1.0, alpha8(LINK_TINT, link.alpha()));
    }

    let spin = Vec2::from_angle(starfield.cross_rotation().to_radians());
    for star in &starfield.stars {
        let color = alpha8(Color::WHITE, star.alpha);
        let size = star.drawn_size();
        match star.kind {
            StarKind::Dot => canvas.fill_circle(star.position, size * 0.5, color),
            StarKind::Cross => {
                let arm = spin * size * 1.5;
                canvas.stroke_line(star.position - arm, star.position + arm, 1.0, color);
                let arm = arm.perp();
                canvas.stroke_line(star.position - arm, star.position + arm, 1.0, color);
            }
            StarKind::Giant => {
                canvas.fill_radial_gradient(
                    star.position,
                    Vec2::splat(size * 3.0),
                    0.0,
                    &[(0.0, color.with_alpha(color.a * 0.5)), (1.0, color.with_alpha(0.0))],
                );
                canvas.fill_circle(star.position, size * 0.5, color);
            }
        }
    }
}

fn paint_sun(sun: &Sun, accent: Color, canvas: &mut VectorCanvas) {
    let o = sun.opacity();
    let r = sun.radius * sun.scale();
    let extent = sun.extent() * sun.scale();

    canvas.fill_radial_gradient(
        Vec2::ZERO,
        Vec2::splat(extent),
        0.0,
        &[
            (0.0, accent.with_alpha(0.35).faded(o)),
            (r / extent, accent.with_alpha(0.2).faded(o)),
            (1.0, accent.with_alpha(0.0)),
        ],
    );

    let ring = r * 0.08;
    canvas.stroke_circle(Vec2::ZERO, r, ring, SUN_RING.faded(o));
    canvas.stroke_arc(Vec2::ZERO, r, -90.0, 360.0 * sun.progress(), ring, accent.faded(o));
    canvas.fill_circle(Vec2::ZERO, r - ring, Color::WHITE.faded(o));
}

fn paint_shatter(shatter: &Shatter, at: Vec2, scale: f32, body: Color, shard: Color, canvas: &mut VectorCanvas) {
    for piece in &shatter.remainder {
        canvas.fill_polygon_at(piece, at, scale, body);
    }
    for piece in &shatter.shards {
        canvas.fill_polygon_at(piece, at, scale, shard);
    }
}

fn paint_planet(planet: &Planet, accent: Color, canvas: &mut VectorCanvas) {
    let o = planet.opacity();
    let s = planet.scale();
    let at = planet.position;
    let r = planet.radius * s;
    let status = planet.status();

    let lane = alpha8(accent, OrbitDecoration::alpha(planet.is_highlighted())).faded(o);
    for deco in &planet.orbit_decorations {
        canvas.stroke_dashed_circle(at, deco.radius * s, ORBIT_LINE_WIDTH, deco.dash, deco.gap, 0.0, lane);
    }

    for debris in planet.surface.debris() {
        canvas.fill_polygon_at(&debris.polygon, at, s, debris.color.faded(o));
    }

    match &planet.surface {
        PlanetSurface::Living { continents, .. } => {
            let (light, dark, land) = if status.done {
                (accent.lighter(120), accent.darker(150), alpha8(accent.lighter(130), 200))
            } else {
                (OCEAN_LIGHT, OCEAN_DARK, LAND)
            };
            canvas.fill_radial_gradient(at, Vec2::splat(r), 0.0, &[(0.0, light.faded(o)), (1.0, dark.faded(o))]);
            for continent in continents {
                canvas.fill_polygon_at(continent, at, s, land.faded(o));
            }
        }
        PlanetSurface::Shattered { shatter, .. } => {
            paint_shatter(shatter, at, s, RUBBLE.faded(o), RUBBLE.faded(o), canvas);
        }
    }

    let atmosphere = if status.done { accent.with_alpha(0.4) } else { OUTLINE.with_alpha(0.6) };
    canvas.stroke_dashed_circle(
        at,
        r * ATMOSPHERE_FACTOR,
        (planet.radius * 0.04).max(3.0) * s,
        ATMOSPHERE_DASH,
        ATMOSPHERE_DASH,
        planet.dash_offset,
        atmosphere.faded(o),
    );
    if !status.done && !status.cancelled {
        canvas.stroke_circle(at, r, 2.0, OUTLINE.faded(o));
    }

    for moon in &planet.moons {
        paint_moon(moon, at + moon.position * s, s, o, accent, canvas);
    }
}

fn paint_moon(moon: &Moon, at: Vec2, scale: f32, opacity: f32, accent: Color, canvas: &mut VectorCanvas) {
    let r = moon.radius * scale;
    match &moon.surface {
        MoonSurface::Intact { craters, maria } => {
            let body = if moon.status().done { accent } else { MOON_BODY };
            canvas.fill_circle(at, r, body.faded(opacity));
            for mare in maria {
                canvas.fill_polygon_at(mare, at, scale, body.darker(130).faded(opacity));
            }
            for crater in craters {
                canvas.fill_ellipse(at + crater.rim.center * scale, crater.rim.radii * scale, body.lighter(120).faded(opacity));
                canvas.fill_ellipse(at + crater.pit.center * scale, crater.pit.radii * scale, body.darker(150).faded(opacity));
            }
        }
        MoonSurface::Broken { shatter, dust } => {
            paint_shatter(shatter, at, scale, MOON_RUBBLE.faded(opacity), MOON_SHARD.faded(opacity), canvas);
            for speck in dust {
                canvas.fill_polygon_at(speck, at, scale, MOON_DUST.faded(opacity));
            }
        }
    }
    if moon.is_hovered() {
        canvas.stroke_circle(at, r + 2.0, 1.5, Color::WHITE.with_alpha(0.6).faded(opacity));
    }
}

/// Today's constellation, pinned to the top-left corner of the screen.
fn paint_zodiac(sign: ZodiacSign, camera: &Camera, canvas: &mut VectorCanvas) {
    let px = camera.units_per_pixel();
    let points: Vec<Vec2> = sign.screen_points().map(|p| camera.screen_to_world(p)).collect();

    for pair in points.windows(2) {
        canvas.stroke_line(pair[0], pair[1], 2.0 * px, alpha8(Color::WHITE, 150));
    }
    for p in &points {
        canvas.fill_circle(*p, 8.0 * px, Color::WHITE.with_alpha(0.2));
        canvas.fill_circle(*p, 3.0 * px, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::MapConfig;
    use crate::api::types::IdAllocator;
    use crate::data::task::{Note, TaskNode};
    use crate::systems::layout::build_system;
    use crate::systems::shapes::Rng;
    use crate::systems::vector::VectorVertex;

    fn fixture() -> (Scene, Starfield, Camera) {
        let note = Note::new(
            "Week",
            [
                TaskNode::new("a").with_children([TaskNode::new("a1"), TaskNode::new("a2").checked(true)]),
                TaskNode::new("b").cancelled(true),
                TaskNode::new("c").checked(true),
            ],
        );
        let config = MapConfig {
            star_count: 50,
            ..MapConfig::default()
        };
        let mut rng = Rng::new(5);
        let scene = Scene::new(build_system(&note, &config, &mut IdAllocator::new(), &mut rng));
        let mut starfield = Starfield::new(rng.fork(), &config);
        starfield.populate(Vec2::ZERO, 2000.0);
        let mut camera = Camera::new(800.0, 600.0, config.camera_ease);
        camera.snap_to(scene.focus_rect(&config));
        (scene, starfield, camera)
    }

    fn first_color(canvas: &VectorCanvas) -> [f32; 4] {
        let v = &canvas.buffer()[..VectorVertex::FLOATS];
        [v[2], v[3], v[4], v[5]]
    }

    #[test]
    fn paints_backdrop_first() {
        let (scene, starfield, camera) = fixture();
        let mut canvas = VectorCanvas::new();
        let params = PaintParams {
            scene: &scene,
            starfield: &starfield,
            camera: &camera,
            accent: Color::rgb8(255, 140, 0),
            wallpaper: false,
            zodiac: None,
        };
        paint_map(&params, &mut canvas);
        assert!(canvas.vertex_count() > 0);
        assert_eq!(canvas.vertex_count() % 3, 0);
        assert_eq!(first_color(&canvas), [BACKDROP.r, BACKDROP.g, BACKDROP.b, 1.0]);
    }

    #[test]
    fn wallpaper_mode_skips_background() {
        let (scene, starfield, camera) = fixture();
        let accent = Color::rgb8(255, 140, 0);
        let mut normal = VectorCanvas::new();
        let mut wallpaper = VectorCanvas::new();
        let mut params = PaintParams {
            scene: &scene,
            starfield: &starfield,
            camera: &camera,
            accent,
            wallpaper: false,
            zodiac: None,
        };
        paint_map(&params, &mut normal);
        params.wallpaper = true;
        paint_map(&params, &mut wallpaper);

        assert!(wallpaper.vertex_count() > 0);
        assert!(wallpaper.vertex_count() < normal.vertex_count());
        assert_ne!(first_color(&wallpaper), [BACKDROP.r, BACKDROP.g, BACKDROP.b, 1.0]);
    }

    #[test]
    fn zodiac_adds_geometry() {
        let (scene, starfield, camera) = fixture();
        let mut plain = VectorCanvas::new();
        let mut with_sign = VectorCanvas::new();
        let mut params = PaintParams {
            scene: &scene,
            starfield: &starfield,
            camera: &camera,
            accent: Color::WHITE,
            wallpaper: true,
            zodiac: None,
        };
        paint_map(&params, &mut plain);
        params.zodiac = Some(ZodiacSign::Leo);
        paint_map(&params, &mut with_sign);
        assert!(with_sign.vertex_count() > plain.vertex_count());
    }
}
