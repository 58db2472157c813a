use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

use crate::pose::BodyPose;
use crate::render::skeleton::{BONE_COLOR, FAINT_JOINT_COLOR, JOINT_COLOR, SKELETON_BONES};

/// minifb ベースの表示ウィンドウ
///
/// フレームのBGRピクセルをバッファに写し、その上に骨格を描く
pub struct DisplayWindow {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl DisplayWindow {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    /// ウィンドウが開いていて終了キー (Esc / Q) が押されていないか
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// BGR Mat をバッファに転写する
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let cols = frame.cols() as usize;
        let rows = frame.rows() as usize;
        let step = frame.mat_step().get(0);
        let data = frame.data_bytes()?;

        for y in 0..self.height.min(rows) {
            let row = &data[y * step..];
            for x in 0..self.width.min(cols) {
                let b = row[x * 3] as u32;
                let g = row[x * 3 + 1] as u32;
                let r = row[x * 3 + 2] as u32;
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// 骨格とランドマークを描く
    pub fn draw_pose(&mut self, pose: &BodyPose, visibility_threshold: f32) {
        let w = self.width as u32;
        let h = self.height as u32;

        for (start_id, end_id) in SKELETON_BONES.iter() {
            let start = pose.get(*start_id);
            let end = pose.get(*end_id);
            if start.is_visible(visibility_threshold) && end.is_visible(visibility_threshold) {
                let (x1, y1) = start.to_pixel(w, h);
                let (x2, y2) = end.to_pixel(w, h);
                self.draw_line(x1, y1, x2, y2, BONE_COLOR);
            }
        }

        for landmark in pose.landmarks.iter() {
            let (px, py) = landmark.to_pixel(w, h);
            let color = if landmark.is_visible(visibility_threshold) {
                JOINT_COLOR
            } else {
                FAINT_JOINT_COLOR
            };
            self.draw_circle(px, py, 4, color);
        }
    }

    /// バッファをウィンドウに反映し、キー入力をポーリングする
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Bresenham で線分を描く
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
