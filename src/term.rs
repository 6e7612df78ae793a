use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, panic, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::warn;

/// The colours things are drawn in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Palette {
    Egg,
    Snake,
    Text,
}

impl Palette {
    fn color(self) -> Color {
        match self {
            Palette::Egg | Palette::Text => Color::Cyan,
            Palette::Snake => Color::Red,
        }
    }
}

/// Everything the simulation needs from a display. Drawing is buffered
/// until `flush`.
pub trait Screen {
    /// Current (width, height), queried once per frame.
    fn size(&self) -> Result<(TermInt, TermInt)>;

    fn clear(&mut self) -> Result<()>;

    /// Draws one glyph. Cells outside the display are skipped.
    fn draw(&mut self, pos: Coords, ch: char, color: Palette, bold: bool) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Next pending key press, without waiting.
    fn poll_key(&mut self) -> Result<Option<KeyEvent>>;

    fn read_key_blocking(&mut self) -> Result<KeyEvent>;

    /// Best effort, never fails.
    fn beep(&mut self);

    fn draw_text(&mut self, pos: Coords, text: &str, color: Palette) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.draw((pos.0 + i as i32, pos.1), ch, color, false)?;
        }
        Ok(())
    }

    /// Writes `lines` centered on the display, each padded by a blank
    /// column on either side.
    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let (width, height) = self.size()?;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32 + 2;
        let msg_height = lines.len() as i32 + 2;
        let left = (width as i32 - msg_width) / 2;
        let top = (height as i32 - msg_height) / 2;

        for row in 0..msg_height {
            let line = match row {
                0 => "",
                r if r == msg_height - 1 => "",
                r => lines[r as usize - 1],
            };
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.draw_text((left, top + row), &padded, Palette::Text)?;
        }

        self.flush()
    }
}

/// Puts the terminal back the way it was found: colours, cursor, main
/// screen, cooked mode.
fn reset_terminal<W: Write>(mut out: W) -> Result<()> {
    let shown = execute!(
        out,
        style::ResetColor,
        cursor::Show,
        cursor::EnableBlinking,
        LeaveAlternateScreen
    )
    .context("Error leaving alt screen");
    terminal::disable_raw_mode().context("Error unsetting raw mode")?;
    shown
}

/// Restores the terminal before the panic message is printed, so it
/// lands on the main screen instead of vanishing with the alternate one.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = reset_terminal(stdout());
        default_hook(info);
    }));
}

/// Owns the terminal while the game runs. Dropping it restores the
/// terminal if `setup` got anywhere and `restore` wasn't called.
pub struct TermManager<W: Write = Stdout> {
    out: W,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager::with_writer(stdout())
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W) -> Self {
        TermManager { out, active: false }
    }

    pub fn setup(&mut self) -> Result<()> {
        self.active = true;
        execute!(self.out, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        reset_terminal(&mut self.out)
    }
}

impl<W: Write> Drop for TermManager<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Error restoring terminal: {}", e);
        }
    }
}

impl<W: Write> Screen for TermManager<W> {
    fn size(&self) -> Result<(TermInt, TermInt)> {
        terminal::size().context("Error reading size")
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All)).context("Error clearing")
    }

    fn draw(&mut self, pos: Coords, ch: char, color: Palette, bold: bool) -> Result<()> {
        if pos.0 < 0 || pos.1 < 0 || pos.0 > TermInt::MAX as i32 || pos.1 > TermInt::MAX as i32 {
            return Ok(());
        }

        queue!(
            self.out,
            cursor::MoveTo(pos.0 as TermInt, pos.1 as TermInt),
            style::SetAttribute(Attribute::Reset),
            style::SetForegroundColor(color.color())
        )
        .context("Error drawing")?;

        if bold {
            queue!(self.out, style::SetAttribute(Attribute::Bold)).context("Error drawing")?;
        }

        queue!(self.out, style::Print(ch)).context("Error drawing")
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().context("Error flushing")
    }

    fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
        // Drain anything that isn't a key (resizes, mouse) so it can't
        // hide a key press queued behind it.
        while poll(Duration::from_millis(0)).context("Error polling input")? {
            if let Event::Key(ev) = read().context("Error reading input")? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    fn read_key_blocking(&mut self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading input")? {
                return Ok(ev);
            }
        }
    }

    fn beep(&mut self) {
        let res = queue!(self.out, style::Print('\x07'));
        if let Err(e) = res {
            warn!("Beep failed: {}", e);
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    /// In-memory screen. Cells hold what was drawn since the last clear.
    pub struct MemScreen {
        pub width: TermInt,
        pub height: TermInt,
        pub keys: VecDeque<KeyEvent>,
        pub beeps: usize,
        pub flushes: usize,
        cells: HashMap<Coords, (char, Palette, bool)>,
    }

    impl MemScreen {
        pub fn new(width: TermInt, height: TermInt) -> Self {
            MemScreen {
                width,
                height,
                keys: VecDeque::new(),
                beeps: 0,
                flushes: 0,
                cells: HashMap::new(),
            }
        }

        pub fn char_at(&self, pos: Coords) -> char {
            self.cells.get(&pos).map(|c| c.0).unwrap_or(' ')
        }

        pub fn color_at(&self, pos: Coords) -> Option<Palette> {
            self.cells.get(&pos).map(|c| c.1)
        }

        pub fn is_bold(&self, pos: Coords) -> bool {
            self.cells.get(&pos).map(|c| c.2).unwrap_or(false)
        }

        pub fn rows(&self) -> Vec<String> {
            (0..self.height as i32)
                .map(|y| (0..self.width as i32).map(|x| self.char_at((x, y))).collect())
                .collect()
        }
    }

    impl Screen for MemScreen {
        fn size(&self) -> Result<(TermInt, TermInt)> {
            Ok((self.width, self.height))
        }

        fn clear(&mut self) -> Result<()> {
            self.cells.clear();
            Ok(())
        }

        fn draw(&mut self, pos: Coords, ch: char, color: Palette, bold: bool) -> Result<()> {
            if pos.0 >= 0 && pos.1 >= 0 && pos.0 < self.width as i32 && pos.1 < self.height as i32 {
                self.cells.insert(pos, (ch, color, bold));
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }

        fn poll_key(&mut self) -> Result<Option<KeyEvent>> {
            Ok(self.keys.pop_front())
        }

        fn read_key_blocking(&mut self) -> Result<KeyEvent> {
            self.keys.pop_front().ok_or_else(|| anyhow::anyhow!("no keys queued"))
        }

        fn beep(&mut self) {
            self.beeps += 1;
        }
    }

    #[test]
    fn test_drop_restores_after_partial_setup() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut term = TermManager::with_writer(&mut out);
            // What setup leaves behind if raw mode can't be enabled
            term.active = true;
            execute!(term.out, EnterAlternateScreen).unwrap();
        }

        let written = String::from_utf8_lossy(&out);
        assert!(written.ends_with("\x1B[?1049l"), "{:?}", written);
    }

    #[test]
    fn test_restore_only_once() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut term = TermManager::with_writer(&mut out);
            term.active = true;
            let _ = term.restore();
        }

        let written = String::from_utf8_lossy(&out);
        assert_eq!(written.matches("\x1B[?1049l").count(), 1);
    }

    #[test]
    fn test_drop_without_setup_leaves_terminal_alone() {
        let mut out: Vec<u8> = Vec::new();
        drop(TermManager::with_writer(&mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_show_message_is_centered() {
        let mut screen = MemScreen::new(11, 5);
        screen.show_message(&["Hi", "there"]).unwrap();

        let rows = screen.rows();
        assert_eq!(rows[1], "    Hi     ");
        assert_eq!(rows[2], "   there   ");
        assert_eq!(screen.color_at((5, 2)), Some(Palette::Text));
        assert_eq!(screen.flushes, 1);
    }
}
