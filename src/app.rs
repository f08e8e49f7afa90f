use crate::render::{Screen, TermGuard};
use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType},
};
use rand::{rngs::StdRng, SeedableRng};
use rdx::config::{write_atomic, Settings};
use rdx::params::PRESETS;
use rdx::seed::fresh_token;
use rdx::{GifFrameEncoder, Playback, Session};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MIN_GRID: usize = 16;
const MAX_GRID: usize = 512;

struct Viewer {
    session: Session,
    settings: Settings,
    preset_idx: usize,
    rng: StdRng,
    status: String,
    captures: u32,
}

impl Viewer {
    fn reseed_fresh(&mut self) {
        let token = fresh_token(&mut self.rng);
        self.session.reseed(token);
    }

    fn next_preset(&mut self) {
        self.preset_idx = (self.preset_idx + 1) % PRESETS.len();
        let dt = self.session.params().dt;
        self.session.set_params(rdx::SimParams {
            dt,
            ..PRESETS[self.preset_idx].params
        });
        let seed = self.session.seed().to_string();
        self.session.reseed(seed);
    }

    fn resize_grid(&mut self, n: usize) {
        let n = n.clamp(MIN_GRID, MAX_GRID);
        if Some(n) != self.session.resolution() {
            // n >= MIN_GRID, so this cannot hit the empty-grid error.
            if let Err(e) = self.session.set_resolution(n) {
                self.status = format!("resize failed: {e}");
            }
        }
    }

    fn capture_path(&mut self) -> PathBuf {
        self.captures += 1;
        let dir = self.settings.capture_dir.clone().unwrap_or_default();
        dir.join(format!(
            "rdx-{}-{:03}.gif",
            self.session.seed(),
            self.captures
        ))
    }

    fn capture(&mut self) {
        let path = self.capture_path();
        let req = self.settings.capture;
        let result = self
            .session
            .capture(&req, &mut GifFrameEncoder::default())
            .map_err(anyhow::Error::from)
            .and_then(|blob| write_atomic(&path, &blob).map(|_| blob.len()));
        self.status = match result {
            Ok(bytes) => format!("saved {} ({} KiB)", path.display(), bytes / 1024),
            Err(e) => format!("capture failed: {e:#}"),
        };
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers) -> bool {
        let coarse = mods.contains(KeyModifiers::SHIFT);
        let nudge = if coarse { 0.002 } else { 0.0005 };
        let p = self.session.params();
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') => self.session.toggle_playback(),
            KeyCode::Char('r') => self.reseed_fresh(),
            KeyCode::Char('R') => {
                let seed = self.session.seed().to_string();
                self.session.reseed(seed);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.next_preset(),
            KeyCode::Char('g') | KeyCode::Char('G') => self.capture(),

            KeyCode::Up => self.session.set_feed((p.feed + nudge).clamp(0.0, 0.1)),
            KeyCode::Down => self.session.set_feed((p.feed - nudge).clamp(0.0, 0.1)),
            KeyCode::Right => self.session.set_kill((p.kill + nudge).clamp(0.0, 0.1)),
            KeyCode::Left => self.session.set_kill((p.kill - nudge).clamp(0.0, 0.1)),

            KeyCode::Char('-') => self
                .session
                .set_steps_per_frame(p.steps_per_frame.saturating_sub(1)),
            KeyCode::Char('=') | KeyCode::Char('+') => self
                .session
                .set_steps_per_frame((p.steps_per_frame + 1).min(50)),

            KeyCode::Char('[') => {
                let n = self.session.resolution().unwrap_or(MIN_GRID);
                self.resize_grid(n / 2);
            }
            KeyCode::Char(']') => {
                let n = self.session.resolution().unwrap_or(MIN_GRID);
                self.resize_grid(n * 2);
            }
            _ => {}
        }
        true
    }

    fn hud_lines(&self, fps: f32) -> [String; 3] {
        let p = self.session.params();
        let n = self.session.resolution().unwrap_or(0);
        let state = match self.session.playback() {
            Playback::Running => "running",
            Playback::Paused => "paused",
            Playback::Suspended => "capturing",
        };
        [
            format!(
                "Gray–Scott  preset:{}  seed:{}  {}  frame:{}  fps:{:>5.1}",
                PRESETS[self.preset_idx].name,
                self.session.seed(),
                state,
                self.session.frames(),
                fps
            ),
            format!(
                "F:{:.4}  k:{:.4}  Du:{:.2}  Dv:{:.2}  dt:{:.2}  steps/frame:{}  grid:{}x{}  keys: Q quit  SPACE pause  R/r reseed  P preset  arrows F/k  -/= speed  [ ] grid  G capture",
                p.feed, p.kill, p.du, p.dv, p.dt, p.steps_per_frame, n, n
            ),
            self.status.clone(),
        ]
    }
}

pub(crate) fn run(settings: Settings) -> Result<()> {
    let params = settings.sim_params()?;
    let preset_idx = settings.preset_index()?;
    let mut session = Session::new(params, settings.seed.clone());
    session.set_resolution(settings.grid_size)?;

    let fps_cap = settings.fps_cap.clamp(5, 240);
    let mut viewer = Viewer {
        session,
        settings,
        preset_idx,
        rng: StdRng::from_entropy(),
        status: String::new(),
        captures: 0,
    };

    let mut tg = TermGuard::new()?;
    let out = &mut tg.out;

    let mut term_size = terminal::size()?;
    let mut screen = Screen::new(term_size.0 as usize, term_size.1 as usize);

    let target = Duration::from_secs_f32(1.0 / fps_cap as f32);
    let mut last_present = Instant::now();
    let mut fps_timer = Instant::now();
    let mut frames: u32 = 0;
    let mut fps: f32 = 0.0;

    loop {
        let now_size = terminal::size()?;
        if now_size != term_size {
            term_size = now_size;
            screen = Screen::new(term_size.0 as usize, term_size.1 as usize);
            execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        }

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press && !viewer.handle_key(k.code, k.modifiers) {
                    return Ok(());
                }
            }
        }

        viewer.session.tick();

        screen.draw(out, viewer.session.pixels())?;
        let [l1, l2, l3] = viewer.hud_lines(fps);
        screen.hud(out, [l1.as_str(), l2.as_str(), l3.as_str()])?;

        frames += 1;
        if fps_timer.elapsed() >= Duration::from_millis(500) {
            fps = frames as f32 / fps_timer.elapsed().as_secs_f32();
            fps_timer = Instant::now();
            frames = 0;
        }

        let elapsed = last_present.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
        last_present = Instant::now();
    }
}
