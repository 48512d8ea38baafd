use crate::error::RenderError;
use crate::layout::{Bounds, Layout};
use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use lexdec_core::AnswerKeys;
use lexdec_session::Summary;
use lexdec_timing::Timer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use string_cache::DefaultAtom as Atom;
use tiny_skia::{Color, Paint, Pixmap, PremultipliedColorU8, Transform};
use tracing::debug;

pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

const BACKGROUND: [u8; 4] = [12, 12, 16, 255];

pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec, RenderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    let font = FontVec::try_from_vec(bytes).map_err(|_| RenderError::InvalidFont {
        path: path.to_path_buf(),
    })?;
    debug!(path = %path.display(), "font loaded");
    Ok(font)
}

/// What one frame should show.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Instructions {
        trials: usize,
    },
    Task {
        stimulus: Option<&'a str>,
        /// 1-based position and run length.
        progress: (usize, usize),
        /// False between an accepted answer and the next stimulus.
        accepting: bool,
        /// Button under the pointer.
        hover: Option<bool>,
    },
    Results {
        summary: Option<Summary>,
    },
}

#[derive(Debug, Clone, Copy)]
enum TextStyle {
    Title = 0,
    Stimulus = 1,
    Body = 2,
    Muted = 3,
}

struct TextCache {
    size_px: f32,
    color: Color,
    map: HashMap<Atom, Arc<Pixmap>>,
}

impl TextCache {
    fn new(size_px: f32, color: Color) -> Self {
        Self {
            size_px,
            color,
            map: HashMap::new(),
        }
    }

    fn get_or_render<F: Font>(&mut self, font: &F, text: &str) -> Option<Arc<Pixmap>> {
        let atom = Atom::from(text);
        if let Some(p) = self.map.get(&atom) {
            return Some(Arc::clone(p));
        }
        let pm = Arc::new(render_text_pixmap(text, self.size_px, font, self.color)?);
        self.map.insert(atom, Arc::clone(&pm));
        Some(pm)
    }
}

/// Rasterizes a single line of text into a tightly sized transparent pixmap.
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with baseline at ascent
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }

    if min_x == f32::INFINITY {
        return Pixmap::new(1, 1);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;

    let mut pm = Pixmap::new(w, h)?;
    let stride = pm.width() as usize;
    let dst = pm.pixels_mut();

    let cu = [
        (color.red() * 255.0) as u8,
        (color.green() * 255.0) as u8,
        (color.blue() * 255.0) as u8,
        (color.alpha() * 255.0) as u8,
    ];

    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            out.draw(|x, y, cov| {
                if cov <= f32::EPSILON {
                    return;
                }
                let ix = (x as f32 + b.min.x - min_x).floor() as i32;
                let iy = (y as f32 + b.min.y - min_y).floor() as i32;
                if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                    return;
                }
                let i = iy as usize * stride + ix as usize;

                // Premultiply source by (coverage * alpha)
                let a_lin = (cov * cu[3] as f32 / 255.0).clamp(0.0, 1.0);
                let sa = (a_lin * 255.0) as u8;
                let src = [
                    (cu[0] as f32 * a_lin) as u8,
                    (cu[1] as f32 * a_lin) as u8,
                    (cu[2] as f32 * a_lin) as u8,
                ];
                if let Some(c) = over(src, sa, dst[i]) {
                    dst[i] = c;
                }
            });
        }
    }

    Some(pm)
}

/// Porter-Duff source-over in premultiplied space.
fn over(src: [u8; 3], sa: u8, bg: PremultipliedColorU8) -> Option<PremultipliedColorU8> {
    let inv = 255 - sa as u32;
    let mix = |s: u8, d: u8| (s as u32 + (d as u32 * inv + 127) / 255).min(255) as u8;
    PremultipliedColorU8::from_rgba(
        mix(src[0], bg.red()),
        mix(src[1], bg.green()),
        mix(src[2], bg.blue()),
        mix(sa, bg.alpha()),
    )
}

/// Blends `src` onto `canvas` centered at `pos`, clipped to the canvas.
fn blit_centered(canvas: &mut Pixmap, src: &Pixmap, pos: (f32, f32)) {
    let (w, h) = (src.width() as i32, src.height() as i32);
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);

    let x = (pos.0 - w as f32 * 0.5) as i32;
    let y = (pos.1 - h as f32 * 0.5) as i32;

    // Cull fully off-screen
    if x + w <= 0 || y + h <= 0 || x >= cw || y >= ch {
        return;
    }

    let dst_x = x.max(0);
    let dst_y = y.max(0);
    let src_x = dst_x - x;
    let src_y = dst_y - y;
    let copy_w = (w - src_x).min(cw - dst_x) as usize;
    let copy_h = (h - src_y).min(ch - dst_y) as usize;

    let src_px = src.pixels();
    let dst_px = canvas.pixels_mut();

    for row in 0..copy_h {
        let s_off = (src_y as usize + row) * w as usize + src_x as usize;
        let d_off = (dst_y as usize + row) * cw as usize + dst_x as usize;
        for i in 0..copy_w {
            let s = src_px[s_off + i];
            match s.alpha() {
                0 => {}
                255 => dst_px[d_off + i] = s,
                sa => {
                    if let Some(c) = over([s.red(), s.green(), s.blue()], sa, dst_px[d_off + i]) {
                        dst_px[d_off + i] = c;
                    }
                }
            }
        }
    }
}

pub struct FrameStats {
    pub clear: Duration,
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

pub struct SkiaRenderer {
    layout: Layout,
    font: FontVec,
    keys: AnswerKeys,
    text: [TextCache; 4],
    canvas: Pixmap,
    clear_buffer: Vec<u8>,
}

fn solid_canvas(width: u32, height: u32) -> Result<(Pixmap, Vec<u8>), RenderError> {
    let mut canvas =
        Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    let [r, g, b, a] = BACKGROUND;
    canvas.fill(Color::from_rgba8(r, g, b, a));
    let clear_buffer = canvas.data().to_vec();
    Ok((canvas, clear_buffer))
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, font: FontVec, keys: AnswerKeys) -> Result<Self, RenderError> {
        let (canvas, clear_buffer) = solid_canvas(width, height)?;
        let white = Color::from_rgba8(240, 240, 240, 255);
        Ok(Self {
            layout: Layout::new(width, height),
            font,
            keys,
            text: [
                TextCache::new(44.0, white),
                TextCache::new(88.0, white),
                TextCache::new(28.0, white),
                TextCache::new(22.0, Color::from_rgba8(150, 150, 160, 255)),
            ],
            canvas,
            clear_buffer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let (canvas, clear_buffer) = solid_canvas(width, height)?;
        self.canvas = canvas;
        self.clear_buffer = clear_buffer;
        self.layout = Layout::new(width, height);
        debug!(width, height, "renderer resized");
        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn render_frame<T: Timer>(
        &mut self,
        view: &View<'_>,
        frame_buffer: &mut [u8],
        timer: &mut T,
    ) -> Result<FrameStats, RenderError> {
        let expected = self.clear_buffer.len();
        if frame_buffer.len() != expected {
            return Err(RenderError::FrameSize {
                expected,
                actual: frame_buffer.len(),
            });
        }

        let t_clear = {
            let t = timer.now();
            self.canvas.data_mut().copy_from_slice(&self.clear_buffer);
            timer.elapsed(t)
        };

        let t_draw = {
            let t = timer.now();
            match view {
                View::Instructions { trials } => self.draw_instructions(*trials),
                View::Task {
                    stimulus,
                    progress,
                    accepting,
                    hover,
                } => self.draw_task(*stimulus, *progress, *accepting, *hover),
                View::Results { summary } => self.draw_results(summary.as_ref()),
            }
            timer.elapsed(t)
        };

        let t_copy = {
            let t = timer.now();
            frame_buffer.copy_from_slice(self.canvas.data());
            timer.elapsed(t)
        };

        let total = t_clear + t_draw + t_copy;
        timer.record_frame(total);

        Ok(FrameStats {
            clear: t_clear,
            draw: t_draw,
            copy: t_copy,
            total,
        })
    }

    fn draw_text(&mut self, style: TextStyle, text: &str, pos: (f32, f32)) {
        let cache = &mut self.text[style as usize];
        let Some(pm) = cache.get_or_render(&self.font, text) else {
            return;
        };
        blit_centered(&mut self.canvas, &pm, pos);
    }

    fn fill(&mut self, bounds: Bounds, color: Color) {
        let Some(rect) = bounds.to_rect() else {
            return;
        };
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(color);
        self.canvas
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn draw_instructions(&mut self, trials: usize) {
        let top = self.layout.center.1 - 180.0;
        let (word, nonword) = (self.keys.label(true), self.keys.label(false));
        let lines = [
            format!("You will see {trials} letter strings, one at a time."),
            "Decide whether each one is a real English word.".to_string(),
            format!("Press {word} for a real word, {nonword} for not a word,"),
            "or click the buttons on screen.".to_string(),
            "Respond as quickly and accurately as you can.".to_string(),
        ];

        self.draw_text(TextStyle::Title, "Before we begin", self.layout.line(0, 0.0, top));
        for (i, line) in lines.iter().enumerate() {
            self.draw_text(TextStyle::Body, line, self.layout.line(i, 44.0, top + 90.0));
        }
        self.draw_text(
            TextStyle::Muted,
            "Press SPACE to start, ESC to exit",
            self.layout.line(0, 0.0, top + 360.0),
        );
    }

    fn draw_task(
        &mut self,
        stimulus: Option<&str>,
        progress: (usize, usize),
        accepting: bool,
        hover: Option<bool>,
    ) {
        let (current, total) = progress;
        let fraction = if total == 0 {
            0.0
        } else {
            current as f32 / total as f32
        };
        let percent = if total == 0 {
            0
        } else {
            (current * 200 + total) / (total * 2)
        };

        let bar = self.layout.progress_bar;
        self.fill(bar, Color::from_rgba8(40, 40, 48, 255));
        self.fill(bar.filled(fraction), Color::from_rgba8(80, 140, 255, 255));
        self.draw_text(
            TextStyle::Muted,
            &format!("Trial {current} of {total}"),
            self.layout.progress_label,
        );
        self.draw_text(TextStyle::Muted, &format!("{percent}%"), self.layout.percent_label);

        self.draw_text(TextStyle::Muted, "Is this a real word?", self.layout.prompt);
        if let Some(text) = stimulus {
            self.draw_text(TextStyle::Stimulus, text, self.layout.stimulus);
        }

        for answer in [true, false] {
            let bounds = if answer {
                self.layout.word_button
            } else {
                self.layout.nonword_button
            };
            let color = match (accepting, hover == Some(answer)) {
                (false, _) => Color::from_rgba8(24, 24, 28, 255),
                (true, true) => Color::from_rgba8(64, 64, 86, 255),
                (true, false) => Color::from_rgba8(40, 40, 48, 255),
            };
            self.fill(bounds, color);

            let (cx, cy) = bounds.center();
            let label = if answer { "Real word" } else { "Not a word" };
            self.draw_text(TextStyle::Body, label, (cx, cy - 14.0));
            let key = format!("(Press {})", self.keys.label(answer));
            self.draw_text(TextStyle::Muted, &key, (cx, cy + 22.0));
        }
    }

    fn draw_results(&mut self, summary: Option<&Summary>) {
        let top = self.layout.center.1 - 200.0;
        let Some(summary) = summary else {
            self.draw_text(TextStyle::Title, "No results found", self.layout.line(0, 0.0, top));
            self.draw_text(
                TextStyle::Body,
                "There is no completed run in this session.",
                self.layout.line(0, 0.0, top + 90.0),
            );
            self.draw_text(
                TextStyle::Muted,
                "Press R to start a new run, ESC to exit",
                self.layout.line(0, 0.0, top + 160.0),
            );
            return;
        };

        let lines = [
            format!("Accuracy: {}%", summary.accuracy),
            format!("Average response time: {} ms", summary.avg_rt_ms),
            format!("{} of {} answered correctly", summary.correct, summary.trials),
        ];
        self.draw_text(TextStyle::Title, "Task complete", self.layout.line(0, 0.0, top));
        for (i, line) in lines.iter().enumerate() {
            self.draw_text(TextStyle::Body, line, self.layout.line(i, 48.0, top + 90.0));
        }
        self.draw_text(
            TextStyle::Muted,
            "Risk band: coming soon",
            self.layout.line(0, 0.0, top + 260.0),
        );
        self.draw_text(
            TextStyle::Muted,
            "This task is not a diagnosis.",
            self.layout.line(0, 0.0, top + 300.0),
        );
        self.draw_text(
            TextStyle::Muted,
            "Press R to restart, ESC to exit",
            self.layout.line(0, 0.0, top + 370.0),
        );
    }
}
