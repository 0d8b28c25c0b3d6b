//! Scripted sessions rendered to PNG.
//!
//! A script is a JSON list of steps (or an object with `screen`,
//! `show_toolbar` and `steps`). Steps are fed through an [`App`] with headless
//! collaborators, starting in drawing mode, and the final overlay is written
//! out with cairo.
//!
//! ```json
//! [
//!   { "tool": "rectangle" },
//!   { "drag": [[10, 10], [50, 40]] },
//!   { "tool": "text" },
//!   { "down": [80, 80] }, { "up": [80, 80] },
//!   { "text": "hello" },
//!   { "key": "Escape" }
//! ]
//! ```

use crate::app::{App, AppEvent};
use crate::config::{ColorSpec, Config, KeyBinding};
use crate::draw::{clear_surface, render_annotations, render_provisional};
use crate::input::{Key, MouseButton, Tool};
use crate::platform::Platform;
use crate::toolbar::{ToolbarButton, render_toolbar};
use crate::util::Rect;
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Simulated time between two steps.
const STEP_INTERVAL: Duration = Duration::from_millis(16);
/// Upper bound on width button presses for one `width` step.
const MAX_WIDTH_PRESSES: usize = 64;

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Press the toggle hotkey
    Hotkey,
    /// Click a tool button on the toolbar
    Tool(String),
    /// Pick a color from the color panel (name or `[r, g, b]`)
    Color(ColorSpec),
    /// Press the width buttons until the width is reached
    Width(f64),
    Down([i32; 2]),
    Move([i32; 2]),
    Up([i32; 2]),
    /// Press, move and release in one step
    Drag([[i32; 2]; 2]),
    /// A key chord such as `"Escape"` or `"Ctrl+Z"`
    Key(String),
    /// Type characters; `\n` becomes Shift+Return
    Text(String),
    /// Let simulated time pass (milliseconds)
    Wait(u64),
}

/// A complete script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Surface size; defaults to 1280x720
    #[serde(default = "default_screen")]
    pub screen: [i32; 2],
    /// Composite the toolbar into the output
    #[serde(default)]
    pub show_toolbar: bool,
    pub steps: Vec<Step>,
}

fn default_screen() -> [i32; 2] {
    [1280, 720]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    Steps(Vec<Step>),
    Full(Script),
}

impl Script {
    pub fn parse(json: &str) -> Result<Self> {
        let file: ScriptFile = serde_json::from_str(json).context("failed to parse replay script")?;
        Ok(match file {
            ScriptFile::Steps(steps) => Script {
                screen: default_screen(),
                show_toolbar: false,
                steps,
            },
            ScriptFile::Full(script) => script,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::parse(&json)
    }
}

/// Drives an [`App`] through a script with a simulated clock.
pub struct Replay {
    app: App,
    now: Instant,
    show_toolbar: bool,
}

impl Replay {
    /// Builds a headless app sized to the script's screen, in drawing mode.
    pub fn new(config: &Config, script: &Script) -> Result<Self> {
        let [width, height] = script.screen;
        let screen = Rect::new(0, 0, width, height)
            .ok_or_else(|| anyhow!("invalid replay screen size {}x{}", width, height))?;
        let (platform, _windows) = Platform::headless(Some(screen));
        let now = Instant::now();
        let mut app = App::new(config, platform, now);
        app.dispatch_at(AppEvent::Hotkey, now);
        Ok(Self {
            app,
            now,
            show_toolbar: script.show_toolbar,
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    fn send(&mut self, event: AppEvent) {
        self.app.dispatch_at(event, self.now);
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            debug!("Replay step {}: {:?}", index, step);
            self.step(step)
                .with_context(|| format!("replay step {} ({:?}) failed", index, step))?;
            self.now += STEP_INTERVAL;
            self.send(AppEvent::Tick);
        }
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Hotkey => self.send(AppEvent::Hotkey),
            Step::Tool(name) => {
                let tool: Tool = name.parse().map_err(|err: String| anyhow!(err))?;
                self.click_toolbar(ToolbarButton::Tool(tool))?;
            }
            Step::Color(spec) => self.send(AppEvent::ColorPicked(spec.to_color())),
            Step::Width(target) => self.set_width(*target)?,
            Step::Down([x, y]) => self.send(AppEvent::PointerDown {
                button: MouseButton::Left,
                x: *x,
                y: *y,
            }),
            Step::Move([x, y]) => self.send(AppEvent::PointerMove { x: *x, y: *y }),
            Step::Up([x, y]) => self.send(AppEvent::PointerUp {
                button: MouseButton::Left,
                x: *x,
                y: *y,
            }),
            Step::Drag([[x1, y1], [x2, y2]]) => {
                self.send(AppEvent::PointerDown {
                    button: MouseButton::Left,
                    x: *x1,
                    y: *y1,
                });
                self.send(AppEvent::PointerMove { x: *x2, y: *y2 });
                self.send(AppEvent::PointerUp {
                    button: MouseButton::Left,
                    x: *x2,
                    y: *y2,
                });
            }
            Step::Key(chord) => self.press_chord(chord)?,
            Step::Text(text) => {
                for c in text.chars() {
                    match c {
                        '\n' => self.press(&[Key::Shift], Key::Return),
                        ' ' => self.press(&[], Key::Space),
                        c => self.press(&[], Key::Char(c)),
                    }
                }
            }
            Step::Wait(ms) => self.now += Duration::from_millis(*ms),
        }
        Ok(())
    }

    fn click_toolbar(&mut self, button: ToolbarButton) -> Result<()> {
        let rect = self
            .app
            .toolbar_layout()
            .button_rect(button)
            .ok_or_else(|| anyhow!("toolbar has no {:?} button", button))?;
        let (x, y) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
        self.send(AppEvent::ToolbarDown { x, y });
        self.send(AppEvent::ToolbarUp { x, y });
        Ok(())
    }

    fn set_width(&mut self, target: f64) -> Result<()> {
        for _ in 0..MAX_WIDTH_PRESSES {
            let current = self.app.input().current_width;
            let button = if current + 0.5 < target {
                ToolbarButton::WidthUp
            } else if current - 0.5 > target {
                ToolbarButton::WidthDown
            } else {
                return Ok(());
            };
            self.click_toolbar(button)?;
            if self.app.input().current_width == current {
                // Clamped at the limit
                return Ok(());
            }
        }
        Ok(())
    }

    fn press_chord(&mut self, chord: &str) -> Result<()> {
        let binding = KeyBinding::parse(chord).map_err(|err| anyhow!(err))?;
        if binding.logo {
            bail!("Super chords cannot reach the overlay: {}", chord);
        }
        let key = parse_key(&binding.key)?;
        let mut modifiers = Vec::new();
        if binding.ctrl {
            modifiers.push(Key::Ctrl);
        }
        if binding.alt {
            modifiers.push(Key::Alt);
        }
        if binding.shift {
            modifiers.push(Key::Shift);
        }
        self.press(&modifiers, key);
        Ok(())
    }

    fn press(&mut self, modifiers: &[Key], key: Key) {
        for modifier in modifiers {
            self.send(AppEvent::KeyDown(*modifier));
        }
        self.send(AppEvent::KeyDown(key));
        self.send(AppEvent::KeyUp(key));
        for modifier in modifiers.iter().rev() {
            self.send(AppEvent::KeyUp(*modifier));
        }
    }

    /// Renders the overlay (and the toolbar, when requested) to an image.
    pub fn render(&self) -> Result<cairo::ImageSurface> {
        let screen = self.app.screen();
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, screen.width, screen.height)
            .context("failed to create image surface")?;
        let ctx = cairo::Context::new(&surface).context("failed to create cairo context")?;

        clear_surface(&ctx);
        let input = self.app.input();
        render_annotations(
            &ctx,
            &input.annotations,
            input.selection(),
            &input.font_family,
        );
        render_provisional(&ctx, input);

        if self.show_toolbar && self.app.is_drawing_mode() {
            let frame = self.app.toolbar_frame();
            ctx.save().context("cairo save failed")?;
            ctx.translate(frame.x as f64, frame.y as f64);
            ctx.push_group();
            render_toolbar(&ctx, self.app.toolbar_layout(), &self.app.toolbar_view());
            ctx.pop_group_to_source()
                .context("failed to composite toolbar")?;
            ctx.paint_with_alpha(self.app.toolbar_opacity())
                .context("failed to paint toolbar")?;
            ctx.restore().context("cairo restore failed")?;
        }

        drop(ctx);
        surface.flush();
        Ok(surface)
    }
}

/// Maps a keybinding key name to an input key.
pub fn parse_key(name: &str) -> Result<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Key::Escape,
        "return" | "enter" => Key::Return,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "tab" => Key::Tab,
        "space" => Key::Space,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => bail!("unknown key '{}'", name),
            }
        }
    };
    Ok(key)
}

/// Runs the script at `script_path` and writes the PNG to `output`.
/// Returns the number of annotations rendered.
pub fn run_to_png(config: &Config, script_path: &Path, output: &Path) -> Result<usize> {
    let script = Script::load(script_path)?;
    let mut replay = Replay::new(config, &script)?;
    replay.run(&script.steps)?;

    let surface = replay.render()?;
    let mut file = fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    surface
        .write_to_png(&mut file)
        .map_err(|err| anyhow!("failed to write PNG {}: {}", output.display(), err))?;

    let count = replay.app().input().annotations.len();
    info!(
        "Replayed {} step(s); rendered {} annotation(s) to {}",
        script.steps.len(),
        count,
        output.display()
    );
    Ok(count)
}
