//! Canvas 2D renderer
//!
//! Strictly read-only over the World; all mutation happens in the sim
//! step. Everything is drawn procedurally - there is no asset pipeline.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::settings::Skin;
use crate::sim::{GamePhase, ItemKind, World};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(BOARD_WIDTH as u32);
        canvas.set_height(BOARD_HEIGHT as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            ctx,
            width: BOARD_WIDTH as f64,
            height: BOARD_HEIGHT as f64,
        })
    }

    /// Paint one frame of the world.
    pub fn render(&self, world: &World, skin: Skin, now_ms: f64) {
        self.draw_background(world);
        self.draw_entities(world, skin, now_ms);
        self.draw_hud(world, now_ms);

        match world.phase {
            GamePhase::NotStarted => self.draw_start_overlay(),
            GamePhase::GameOver => self.draw_game_over_overlay(world),
            GamePhase::Running => {}
        }
    }

    fn draw_background(&self, world: &World) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("black");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str("white");
        for star in &world.stars {
            ctx.fill_rect(
                star.pos.x as f64,
                star.pos.y as f64,
                star.size as f64,
                star.size as f64,
            );
        }
    }

    fn draw_entities(&self, world: &World, skin: Skin, now_ms: f64) {
        let ctx = &self.ctx;
        let invincible = world.is_invincible(now_ms);

        // Ship, blinking at 100 ms intervals while invincible
        let visible = !invincible || (now_ms / 100.0).floor() as i64 % 2 == 0;
        if visible {
            let p = &world.player.pos;
            let size = PLAYER_SIZE as f64;
            ctx.set_fill_style_str(skin.fill_color());
            ctx.begin_path();
            ctx.move_to(p.x as f64 + size / 2.0, p.y as f64);
            ctx.line_to(p.x as f64 + size, p.y as f64 + size);
            ctx.line_to(p.x as f64, p.y as f64 + size);
            ctx.close_path();
            ctx.fill();
        }

        if invincible {
            // Gold aura around the drawn box
            let p = &world.player.pos;
            ctx.set_stroke_style_str("gold");
            ctx.set_line_width(3.0);
            ctx.stroke_rect(
                p.x as f64 - 5.0,
                p.y as f64 - 5.0,
                PLAYER_SIZE as f64 + 10.0,
                PLAYER_SIZE as f64 + 10.0,
            );
        }

        ctx.set_fill_style_str("#a9745b");
        for meteor in &world.meteors {
            ctx.fill_rect(
                meteor.pos.x as f64,
                meteor.pos.y as f64,
                METEOR_SIZE as f64,
                METEOR_SIZE as f64,
            );
        }

        for item in &world.items {
            let (color, label) = match item.kind {
                ItemKind::Invincible => ("gold", "\u{2605}"),
                ItemKind::SlowTime => ("cyan", "TIME"),
            };
            ctx.set_fill_style_str(color);
            ctx.fill_rect(
                item.pos.x as f64,
                item.pos.y as f64,
                ITEM_SIZE as f64,
                ITEM_SIZE as f64,
            );
            ctx.set_fill_style_str("black");
            ctx.set_font("10px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(
                label,
                item.pos.x as f64 + ITEM_SIZE as f64 / 2.0,
                item.pos.y as f64 + ITEM_SIZE as f64 / 2.0 + 3.0,
            );
            ctx.set_text_align("start");
        }
    }

    fn draw_hud(&self, world: &World, now_ms: f64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("white");
        ctx.set_font("20px sans-serif");
        let _ = ctx.fill_text(&format!("Score: {}", world.final_score()), 20.0, 30.0);

        let diff_label = if world.difficulty == crate::sim::Difficulty::Progressive {
            format!("PROG (x{:.2})", world.meteor_speed_scale)
        } else {
            world.difficulty.label().to_string()
        };
        let _ = ctx.fill_text(
            &format!("High Score ({}): {}", diff_label, world.high_score),
            20.0,
            60.0,
        );

        if world.is_invincible(now_ms) {
            ctx.set_fill_style_str("gold");
            let remaining = ((world.invincible_until - now_ms) / 1000.0).ceil();
            let _ = ctx.fill_text(&format!("INVINCIBLE: {}", remaining), 20.0, 90.0);
        }
        if world.is_slow(now_ms) {
            ctx.set_fill_style_str("cyan");
            let remaining = ((world.slow_until - now_ms) / 1000.0).ceil();
            let _ = ctx.fill_text(&format!("SLOW MOTION: {}", remaining), 20.0, 120.0);
        }
    }

    fn draw_start_overlay(&self) {
        let ctx = &self.ctx;
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_font("48px sans-serif");
        let _ = ctx.fill_text("METEOR DODGE", cx, cy - 20.0);
        ctx.set_font("24px sans-serif");
        let _ = ctx.fill_text("Press SPACE or ENTER to Start", cx, cy + 40.0);
        ctx.set_text_align("start");
    }

    fn draw_game_over_overlay(&self, world: &World) {
        let ctx = &self.ctx;
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let bonus = world.destroyed as u64 * DESTROY_BONUS;
        let final_score = world.final_score();

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_font("48px sans-serif");
        let _ = ctx.fill_text("GAME OVER", cx, cy - 20.0);

        ctx.set_font("24px sans-serif");
        let _ = ctx.fill_text(&format!("Base Score: {}", world.score), cx, cy + 30.0);
        ctx.set_fill_style_str("gold");
        let _ = ctx.fill_text(
            &format!("Bonus (+100 x {}): +{}", world.destroyed, bonus),
            cx,
            cy + 60.0,
        );

        ctx.set_fill_style_str("white");
        ctx.set_font("32px sans-serif");
        let _ = ctx.fill_text(&format!("Final Score: {}", final_score), cx, cy + 100.0);

        if final_score >= world.high_score && final_score > 0 {
            ctx.set_fill_style_str("yellow");
            ctx.set_font("24px sans-serif");
            let _ = ctx.fill_text("NEW HIGH SCORE!", cx, cy + 140.0);
            ctx.set_fill_style_str("white");
        }

        ctx.set_font("24px sans-serif");
        let _ = ctx.fill_text("Press SPACE or ENTER to Restart", cx, cy + 180.0);
        ctx.set_text_align("start");
    }
}
