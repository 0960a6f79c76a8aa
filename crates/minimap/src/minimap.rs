use glam::{Vec2, Vec4};
use std::f32::consts::{FRAC_PI_2, PI};
use tidewatch_common::{HeatBlip, lerp, round_to};

use crate::camera::MinimapCamera;
use crate::config::{MinimapConfig, MinimapError};
use crate::event::{BoatTransform, HudEvent, HudEventHandler};
use crate::radar::RadarSweep;
use crate::sprite::{SpriteInstance, SpriteKind};

/// Where the current objective is, from the minimap's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyItemMarker {
    /// The key item is within map range; world position.
    Position(Vec2),
    /// The key item is out of range; unit direction for the edge arrow.
    Direction(Vec2),
}

/// HUD minimap state.
///
/// Tracks the boat, the zoom radius and the radar ping, and turns world
/// positions of blips, survivors and the key item into screen-space
/// [`SpriteInstance`]s. Rendering is left to a [`MinimapRenderer`](crate::MinimapRenderer);
/// game events arrive through [`HudEventHandler`].
#[derive(Debug, Clone)]
pub struct Minimap {
    config: MinimapConfig,
    resolution: Vec2,
    camera: MinimapCamera,
    visible: bool,
    current_radius: f32,
    camera_using_minimum_radius: bool,
    just_updated_camera_dimensions: bool,
    last_known_boat_pos: Vec2,
    last_geometry_render_boat_pos: Vec2,
    radar: RadarSweep,

    background: SpriteInstance,
    geometry: SpriteInstance,
    border: SpriteInstance,
    radar_line: SpriteInstance,
    boat: SpriteInstance,
    key_item: SpriteInstance,
    arrow: SpriteInstance,
    survivors: Vec<SpriteInstance>,
    heat_blips: Vec<SpriteInstance>,
}

impl Minimap {
    /// Lay out the minimap for a render resolution in pixels.
    pub fn new(config: MinimapConfig, resolution: Vec2) -> Result<Self, MinimapError> {
        config.validate()?;
        if !resolution.is_finite() || resolution.min_element() <= 0.0 {
            return Err(MinimapError::InvalidResolution(resolution));
        }

        let layout = &config.layout;
        let center = layout.center * resolution;
        let background = SpriteInstance::at(center, layout.background * resolution);
        let geometry = SpriteInstance::at(center, layout.geometry * resolution);
        let border = SpriteInstance::at(center, layout.border * resolution);
        let radar_line = SpriteInstance::at(center, layout.radar_line * resolution);
        let arrow = SpriteInstance {
            size: layout.arrow * resolution,
            hidden: true,
            ..SpriteInstance::default()
        };

        let current_radius = config.min_radius;
        let camera = MinimapCamera::for_radius(config.min_radius, &config);
        let radar = RadarSweep::new(config.radar_duration, config.radar_line_speed);

        let mut minimap = Self {
            config,
            resolution,
            camera,
            visible: false,
            current_radius,
            camera_using_minimum_radius: true,
            just_updated_camera_dimensions: false,
            last_known_boat_pos: Vec2::ZERO,
            last_geometry_render_boat_pos: Vec2::ZERO,
            radar,
            background,
            geometry,
            border,
            radar_line,
            boat: SpriteInstance::at(center, Vec2::ZERO),
            key_item: SpriteInstance::hidden(),
            arrow,
            survivors: Vec::new(),
            heat_blips: Vec::new(),
        };
        minimap.resize_boat();
        Ok(minimap)
    }

    /// Advance the radar sweep and resize the boat for the current zoom.
    /// Does nothing while the HUD is hidden.
    pub fn update(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        self.resize_boat();
        self.radar.update(dt);
        self.radar_line.rotation = self.radar.line_rotation();
    }

    /// Boat position (map units) at the time the map geometry was last
    /// captured. Used to offset the captured canvas.
    pub fn update_geometry_render_boat_pos(&mut self, position: Vec2) {
        self.last_geometry_render_boat_pos = position;
    }

    /// Rebuild the radar-revealed markers from fresh world data.
    ///
    /// Enemy blips fade with both radar visibility and heat; leviathan blips
    /// fade with radar visibility only. Both are scaled by their heat.
    pub fn refresh_dynamic_sprites(
        &mut self,
        enemy_blips: &[HeatBlip],
        leviathan_blips: &[HeatBlip],
        survivors: &[Vec2],
        key_item: KeyItemMarker,
    ) {
        let resize = self.zoom_fraction().clamp(0.0, 1.0) + 1.0;
        let radius_scalar = self.radius_scalar();
        let visibility = self.radar.visibility();
        let markers = self.config.markers.clone();

        match key_item {
            KeyItemMarker::Direction(direction) => {
                self.key_item.hidden = true;
                self.arrow.hidden = false;
                self.arrow.position =
                    self.border.position + direction * self.border.size.x * 0.5;
                self.arrow.rotation = direction.y.atan2(direction.x) - FRAC_PI_2;
            }
            KeyItemMarker::Position(world) => {
                self.key_item.hidden = false;
                self.arrow.hidden = true;
                self.key_item.position = self.relative_hud_position(world);
                self.key_item.size = markers.key_item * resize * self.resolution * radius_scalar;
                self.key_item.alpha = visibility;
            }
        }

        self.survivors = survivors
            .iter()
            .map(|&world| SpriteInstance {
                alpha: visibility,
                ..SpriteInstance::at(
                    self.relative_hud_position(world),
                    markers.survivor * resize * self.resolution * radius_scalar,
                )
            })
            .collect();

        let blip_size = markers.heat_blip * self.resolution * radius_scalar;
        let enemies = enemy_blips.iter().map(|blip| SpriteInstance {
            size_multiplier: Vec2::splat(blip.heat),
            alpha: visibility * blip.heat,
            ..SpriteInstance::at(self.relative_hud_position(blip.position), blip_size)
        });
        let leviathans = leviathan_blips.iter().map(|blip| SpriteInstance {
            size_multiplier: Vec2::splat(blip.heat),
            alpha: visibility,
            ..SpriteInstance::at(self.relative_hud_position(blip.position), blip_size)
        });
        self.heat_blips = enemies.chain(leviathans).collect();

        self.radar_line.alpha = visibility;

        tracing::trace!(
            blips = self.heat_blips.len(),
            survivors = self.survivors.len(),
            visibility,
            "minimap sprites refreshed"
        );
    }

    /// Screen position of a world position, relative to the boat at the
    /// minimap center. A point one radius away lands on the background edge.
    pub fn relative_hud_position(&self, world: Vec2) -> Vec2 {
        let relative = self.last_known_boat_pos - world / self.config.world_to_map;
        let hud_scalar = relative.length() / self.current_radius;
        self.background.position
            + relative.normalize_or_zero() * self.background.size.x * 0.5 * hud_scalar
    }

    /// Parameters for the map shader: the visible radius as a fraction of the
    /// captured canvas (xy) and the boat's UV offset within it (zw).
    pub fn map_params(&self) -> Vec4 {
        let dims = self.camera.dimensions();
        let canvas_min = self.last_geometry_render_boat_pos - dims / 2.0;
        let offset = (self.last_known_boat_pos - canvas_min) / dims;
        Vec4::new(
            self.current_radius / dims.x,
            self.current_radius / dims.y,
            (offset.x - 1.0).abs(),
            offset.y,
        )
    }

    /// Everything a renderer needs for this frame, or `None` while hidden.
    pub fn frame(&self) -> Option<MinimapFrame<'_>> {
        if !self.visible {
            return None;
        }
        let radar = self.radar.is_active().then(|| RadarLayer {
            heat_blips: &self.heat_blips,
            survivors: &self.survivors,
            key_item: &self.key_item,
            arrow: &self.arrow,
            radar_line: &self.radar_line,
        });
        Some(MinimapFrame {
            background: &self.background,
            geometry: &self.geometry,
            border: &self.border,
            boat: &self.boat,
            radar,
            map_params: self.map_params(),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_radar_active(&self) -> bool {
        self.radar.is_active()
    }

    pub fn radar(&self) -> &RadarSweep {
        &self.radar
    }

    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    pub fn camera(&self) -> &MinimapCamera {
        &self.camera
    }

    pub fn camera_using_minimum_radius(&self) -> bool {
        self.camera_using_minimum_radius
    }

    /// Set when the camera switched radius since the last reset. The owner
    /// re-captures the map geometry and then clears it.
    pub fn just_updated_camera_dimensions(&self) -> bool {
        self.just_updated_camera_dimensions
    }

    pub fn reset_just_updated_camera_dimensions(&mut self) {
        self.just_updated_camera_dimensions = false;
    }

    /// Boat position in map units.
    pub fn last_known_boat_pos(&self) -> Vec2 {
        self.last_known_boat_pos
    }

    pub fn boat(&self) -> &SpriteInstance {
        &self.boat
    }

    pub fn key_item(&self) -> &SpriteInstance {
        &self.key_item
    }

    pub fn arrow(&self) -> &SpriteInstance {
        &self.arrow
    }

    pub fn survivors(&self) -> &[SpriteInstance] {
        &self.survivors
    }

    pub fn heat_blips(&self) -> &[SpriteInstance] {
        &self.heat_blips
    }

    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    /// How far the radius is past the minimum, in units of the minimum radius.
    fn zoom_fraction(&self) -> f32 {
        (self.current_radius - self.config.min_radius) / self.config.min_radius
    }

    /// Markers shrink as the map zooms out.
    fn radius_scalar(&self) -> f32 {
        lerp(0.2, 0.1, self.zoom_fraction())
    }

    fn resize_boat(&mut self) {
        self.boat.size = self.config.markers.boat * self.resolution * self.radius_scalar();
    }

    fn apply_boat_transform(&mut self, transform: &BoatTransform) {
        self.boat.rotation = transform.yaw_degrees.to_radians() + PI;
        self.last_known_boat_pos = Vec2::new(transform.x, transform.z) / self.config.world_to_map;

        let zoom = round_to(transform.zoom, 3);
        self.current_radius = lerp(self.config.min_radius, self.config.max_radius, zoom);

        let at_minimum = self.current_radius == self.config.min_radius;
        if at_minimum != self.camera_using_minimum_radius {
            let radius = if at_minimum {
                self.config.min_radius
            } else {
                self.config.max_radius
            };
            self.camera = MinimapCamera::for_radius(radius, &self.config);
            self.camera_using_minimum_radius = at_minimum;
            self.just_updated_camera_dimensions = true;
            tracing::debug!(radius, "minimap camera resized");
        }
    }
}

impl HudEventHandler for Minimap {
    fn handle(&mut self, event: &HudEvent) {
        match event {
            HudEvent::ShowHud(show) => {
                if self.visible != *show {
                    tracing::debug!(visible = *show, "minimap visibility changed");
                }
                self.visible = *show;
            }
            HudEvent::BoatTransformUpdate(transform) => self.apply_boat_transform(transform),
            HudEvent::StartRadarPing => {
                tracing::debug!("radar ping started");
                self.radar.ping();
            }
        }
    }
}

/// Sprites revealed by a radar ping.
#[derive(Debug, Clone, Copy)]
pub struct RadarLayer<'a> {
    pub heat_blips: &'a [SpriteInstance],
    pub survivors: &'a [SpriteInstance],
    pub key_item: &'a SpriteInstance,
    pub arrow: &'a SpriteInstance,
    pub radar_line: &'a SpriteInstance,
}

/// One frame of minimap output. Always-on layers plus the radar layer while
/// a ping is running.
#[derive(Debug, Clone, Copy)]
pub struct MinimapFrame<'a> {
    pub background: &'a SpriteInstance,
    pub geometry: &'a SpriteInstance,
    pub border: &'a SpriteInstance,
    pub boat: &'a SpriteInstance,
    pub radar: Option<RadarLayer<'a>>,
    pub map_params: Vec4,
}

impl<'a> MinimapFrame<'a> {
    /// Every instance that would put pixels on screen, tagged with its kind.
    pub fn drawn_sprites(&self) -> Vec<(SpriteKind, &'a SpriteInstance)> {
        let mut sprites = vec![
            (SpriteKind::Background, self.background),
            (SpriteKind::Geometry, self.geometry),
            (SpriteKind::Border, self.border),
        ];
        if let Some(radar) = &self.radar {
            sprites.extend(radar.heat_blips.iter().map(|s| (SpriteKind::HeatBlip, s)));
            sprites.extend(radar.survivors.iter().map(|s| (SpriteKind::Survivor, s)));
            sprites.push((SpriteKind::KeyItem, radar.key_item));
            sprites.push((SpriteKind::Arrow, radar.arrow));
            sprites.push((SpriteKind::RadarLine, radar.radar_line));
        }
        sprites.push((SpriteKind::Boat, self.boat));
        sprites.retain(|(_, s)| s.is_drawn());
        sprites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn minimap() -> Minimap {
        Minimap::new(MinimapConfig::default(), Vec2::splat(1000.0)).unwrap()
    }

    fn boat_at(x: f32, z: f32, zoom: f32) -> HudEvent {
        HudEvent::BoatTransformUpdate(BoatTransform {
            x,
            z,
            yaw_degrees: 0.0,
            zoom,
        })
    }

    /// Visible minimap with the radar at its peak.
    fn pinged_minimap() -> Minimap {
        let mut map = minimap();
        map.handle(&HudEvent::ShowHud(true));
        map.handle(&HudEvent::StartRadarPing);
        map.update(5.0);
        map
    }

    #[test]
    fn layout_follows_resolution() {
        let map = minimap();
        let frame_center = Vec2::new(922.5, 865.0);
        assert!(close(map.background.position, frame_center));
        assert!(close(map.background.size, Vec2::new(135.0, 250.0)));
        assert!(close(map.border.size, Vec2::new(132.3, 245.0)));
        assert!(close(map.boat().position, frame_center));
        // Fully zoomed in: radius scalar 0.2.
        assert!(close(map.boat().size, Vec2::new(7.0, 25.0)));
        assert!(map.key_item().hidden);
        assert!(map.arrow().hidden);
    }

    #[test]
    fn rejects_bad_resolution_and_config() {
        assert_eq!(
            Minimap::new(MinimapConfig::default(), Vec2::new(0.0, 1080.0)).unwrap_err(),
            MinimapError::InvalidResolution(Vec2::new(0.0, 1080.0))
        );
        let config = MinimapConfig {
            min_radius: -1.0,
            ..MinimapConfig::default()
        };
        assert!(Minimap::new(config, Vec2::splat(1000.0)).is_err());
    }

    #[test]
    fn hidden_until_shown() {
        let mut map = minimap();
        assert!(map.frame().is_none());
        map.handle(&HudEvent::ShowHud(true));
        assert!(map.frame().is_some());
        map.handle(&HudEvent::ShowHud(false));
        assert!(map.frame().is_none());
    }

    #[test]
    fn update_is_noop_while_hidden() {
        let mut map = minimap();
        map.handle(&HudEvent::StartRadarPing);
        map.update(5.0);
        assert_eq!(map.radar().timer().current_value(), 10.0);
        assert_eq!(map.radar().line_rotation(), 0.0);
    }

    #[test]
    fn boat_transform_sets_position_and_heading() {
        let mut map = minimap();
        map.handle(&HudEvent::BoatTransformUpdate(BoatTransform {
            x: 500.0,
            z: -300.0,
            yaw_degrees: 90.0,
            zoom: 0.0,
        }));
        assert!(close(map.last_known_boat_pos(), Vec2::new(5.0, -3.0)));
        assert!((map.boat().rotation - (FRAC_PI_2 + PI)).abs() < 1e-5);
        assert_eq!(map.current_radius(), 100.0);
        assert!(map.camera_using_minimum_radius());
        assert!(!map.just_updated_camera_dimensions());
    }

    #[test]
    fn zooming_out_switches_camera() {
        let mut map = minimap();
        map.handle(&boat_at(0.0, 0.0, 0.5));
        assert_eq!(map.current_radius(), 150.0);
        assert!(!map.camera_using_minimum_radius());
        assert!(map.just_updated_camera_dimensions());
        // The camera jumps straight to the maximum radius.
        assert_eq!(map.camera().radius(), 200.0);
        assert_eq!(map.camera().half_extent(), 42_000.0);

        map.reset_just_updated_camera_dimensions();
        map.handle(&boat_at(0.0, 0.0, 0.8));
        assert!(!map.just_updated_camera_dimensions());

        // Rounds to 0.000: back to the minimum.
        map.handle(&boat_at(0.0, 0.0, 0.0004));
        assert_eq!(map.current_radius(), 100.0);
        assert!(map.camera_using_minimum_radius());
        assert!(map.just_updated_camera_dimensions());
        assert_eq!(map.camera().radius(), 100.0);
    }

    #[test]
    fn tiny_zoom_still_counts_as_zoomed_out() {
        let mut map = minimap();
        // Rounds to 0.001.
        map.handle(&boat_at(0.0, 0.0, 0.0006));
        assert!(map.current_radius() > 100.0);
        assert!(!map.camera_using_minimum_radius());
    }

    #[test]
    fn boat_shrinks_when_zoomed_out() {
        let mut map = minimap();
        map.handle(&HudEvent::ShowHud(true));
        map.handle(&boat_at(0.0, 0.0, 1.0));
        map.update(0.0);
        // radius 200: zoom fraction 1, radius scalar 0.1.
        assert!(close(map.boat().size, Vec2::new(3.5, 12.5)));
    }

    #[test]
    fn relative_position_is_mirrored_around_boat() {
        let map = minimap();
        let center = Vec2::new(922.5, 865.0);
        assert!(close(map.relative_hud_position(Vec2::ZERO), center));
        // One radius (100 map units = 10000 world units) to the west lands on
        // the east edge of the background.
        assert!(close(
            map.relative_hud_position(Vec2::new(-10_000.0, 0.0)),
            center + Vec2::new(67.5, 0.0)
        ));
        // Half a radius south lands halfway to the north edge.
        assert!(close(
            map.relative_hud_position(Vec2::new(0.0, -5_000.0)),
            center + Vec2::new(0.0, 33.75)
        ));
    }

    #[test]
    fn relative_position_tracks_boat() {
        let mut map = minimap();
        map.handle(&boat_at(10_000.0, 0.0, 0.0));
        let center = Vec2::new(922.5, 865.0);
        assert!(close(map.relative_hud_position(Vec2::new(10_000.0, 0.0)), center));
        assert!(close(
            map.relative_hud_position(Vec2::ZERO),
            center + Vec2::new(67.5, 0.0)
        ));
    }

    #[test]
    fn map_params_center_boat_on_canvas() {
        let mut map = minimap();
        let params = map.map_params();
        assert!((params.x - 100.0 / 420.0).abs() < 1e-5);
        assert!((params.y - 100.0 / 420.0).abs() < 1e-5);
        assert!((params.z - 0.5).abs() < 1e-5);
        assert!((params.w - 0.5).abs() < 1e-5);

        // Boat drifts 42 map units east of the captured canvas center.
        map.handle(&boat_at(4_200.0, 0.0, 0.0));
        let params = map.map_params();
        assert!((params.z - 0.4).abs() < 1e-4);
        assert!((params.w - 0.5).abs() < 1e-5);

        map.update_geometry_render_boat_pos(Vec2::new(42.0, 0.0));
        assert!((map.map_params().z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn radar_layer_only_while_pinged() {
        let mut map = minimap();
        map.handle(&HudEvent::ShowHud(true));
        assert!(map.frame().unwrap().radar.is_none());

        map.handle(&HudEvent::StartRadarPing);
        map.update(1.0);
        assert!(map.is_radar_active());
        assert!(map.frame().unwrap().radar.is_some());

        map.update(20.0);
        assert!(!map.is_radar_active());
        assert!(map.frame().unwrap().radar.is_none());
    }

    #[test]
    fn blip_opacity_differs_by_kind() {
        let mut map = pinged_minimap();
        assert!((map.radar().visibility() - 1.0).abs() < 1e-6);

        let enemies = [HeatBlip::new(Vec2::new(1_000.0, 0.0), 0.5)];
        let leviathans = [HeatBlip::new(Vec2::new(0.0, 1_000.0), 0.25)];
        map.refresh_dynamic_sprites(&enemies, &leviathans, &[], KeyItemMarker::Position(Vec2::ZERO));

        let blips = map.heat_blips();
        assert_eq!(blips.len(), 2);
        assert!((blips[0].alpha - 0.5).abs() < 1e-6);
        assert_eq!(blips[0].size_multiplier, Vec2::splat(0.5));
        assert!((blips[1].alpha - 1.0).abs() < 1e-6);
        assert_eq!(blips[1].size_multiplier, Vec2::splat(0.25));
        // Blips are not enlarged by the zoom resize scalar.
        assert!(close(blips[0].size, Vec2::new(11.4, 20.0)));
    }

    #[test]
    fn survivors_and_key_item_use_resize_scalar() {
        let mut map = pinged_minimap();
        map.handle(&boat_at(0.0, 0.0, 1.0));
        map.refresh_dynamic_sprites(
            &[],
            &[],
            &[Vec2::new(5_000.0, 0.0), Vec2::ZERO],
            KeyItemMarker::Position(Vec2::new(0.0, 2_000.0)),
        );

        let survivors = map.survivors();
        assert_eq!(survivors.len(), 2);
        // resize 2, radius scalar 0.1.
        assert!(close(survivors[0].size, Vec2::new(15.0, 20.0)));
        assert!((survivors[0].alpha - map.radar().visibility()).abs() < 1e-6);

        assert!(!map.key_item().hidden);
        assert!(map.arrow().hidden);
        assert!(close(map.key_item().size, Vec2::new(11.4, 20.0)));
    }

    #[test]
    fn off_map_key_item_shows_arrow() {
        let mut map = pinged_minimap();
        map.refresh_dynamic_sprites(&[], &[], &[], KeyItemMarker::Direction(Vec2::Y));

        assert!(map.key_item().hidden);
        let arrow = map.arrow();
        assert!(!arrow.hidden);
        assert!(close(arrow.position, Vec2::new(922.5, 865.0 + 66.15)));
        assert!(arrow.rotation.abs() < 1e-6);

        map.refresh_dynamic_sprites(&[], &[], &[], KeyItemMarker::Direction(Vec2::X));
        assert!((map.arrow().rotation + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn refresh_replaces_previous_markers() {
        let mut map = pinged_minimap();
        let blips = [HeatBlip::new(Vec2::ZERO, 1.0); 3];
        map.refresh_dynamic_sprites(&blips, &[], &[Vec2::ZERO], KeyItemMarker::Position(Vec2::ZERO));
        assert_eq!(map.heat_blips().len(), 3);
        map.refresh_dynamic_sprites(&[], &[], &[], KeyItemMarker::Position(Vec2::ZERO));
        assert!(map.heat_blips().is_empty());
        assert!(map.survivors().is_empty());
    }

    #[test]
    fn drawn_sprites_skip_hidden_and_transparent() {
        let mut map = pinged_minimap();
        map.refresh_dynamic_sprites(
            &[HeatBlip::new(Vec2::ZERO, 0.0)],
            &[],
            &[Vec2::ZERO],
            KeyItemMarker::Position(Vec2::ZERO),
        );
        let frame = map.frame().unwrap();
        let kinds: Vec<SpriteKind> = frame.drawn_sprites().iter().map(|(k, _)| *k).collect();

        assert!(kinds.contains(&SpriteKind::Background));
        assert!(kinds.contains(&SpriteKind::Boat));
        assert!(kinds.contains(&SpriteKind::Survivor));
        assert!(kinds.contains(&SpriteKind::KeyItem));
        assert!(kinds.contains(&SpriteKind::RadarLine));
        // Zero-heat enemy blip is fully transparent, the arrow is hidden.
        assert!(!kinds.contains(&SpriteKind::HeatBlip));
        assert!(!kinds.contains(&SpriteKind::Arrow));
    }

    #[test]
    fn radar_line_rotates_while_visible() {
        let mut map = minimap();
        map.handle(&HudEvent::ShowHud(true));
        map.update(1.0);
        let expected = FRAC_PI_2 * 1.5;
        assert!((map.radar_line.rotation - expected).abs() < 1e-5);
    }
}
