//! Recording test doubles for the hardware traits

use std::collections::VecDeque;

use nasmon_hal::{
    Bargraph, BargraphError, ButtonEdge, DebouncedButton, DisplayError, LedColor, LinkError,
    PixelDisplay, SerialLink, StatusLed, TextStyle, FRAMEBUFFER_LEN, SEGMENT_COUNT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    Bitmap { x: u8, y: u8, width: u8, height: u8 },
    Text { x: u8, y: u8, style: TextStyle, text: String },
    Rect { x: u8, y: u8, width: u8, height: u8 },
    Fill { x: u8, y: u8, width: u8, height: u8 },
    Commit,
    Load,
}

/// Display whose framebuffer changes in simple, checkable ways
pub struct MockDisplay {
    pub buffer: [u8; FRAMEBUFFER_LEN],
    pub ops: Vec<DisplayOp>,
    pub fail_commit: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            buffer: [0; FRAMEBUFFER_LEN],
            ops: Vec::new(),
            fail_commit: false,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn commits(&self) -> usize {
        self.ops.iter().filter(|op| **op == DisplayOp::Commit).count()
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|&b| b == 0)
    }
}

impl PixelDisplay for MockDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0);
        self.ops.push(DisplayOp::Clear);
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        let len = data.len().min(FRAMEBUFFER_LEN);
        self.buffer[..len].copy_from_slice(&data[..len]);
        self.ops.push(DisplayOp::Bitmap {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: u8,
        y: u8,
        style: TextStyle,
        text: &str,
    ) -> Result<(), DisplayError> {
        for (offset, byte) in text.bytes().enumerate() {
            let index = (usize::from(x) + offset) % FRAMEBUFFER_LEN;
            self.buffer[index] = byte;
        }
        self.ops.push(DisplayOp::Text {
            x,
            y,
            style,
            text: String::from(text),
        });
        Ok(())
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError> {
        self.buffer[usize::from(x)] |= 0x80;
        self.ops.push(DisplayOp::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError> {
        self.buffer[FRAMEBUFFER_LEN - 1] = width;
        self.ops.push(DisplayOp::Fill {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        if self.fail_commit {
            return Err(DisplayError::Communication);
        }
        self.ops.push(DisplayOp::Commit);
        Ok(())
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        if buffer.len() != FRAMEBUFFER_LEN {
            return Err(DisplayError::BufferSize);
        }
        self.buffer.copy_from_slice(buffer);
        self.ops.push(DisplayOp::Load);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BargraphCall {
    Segment(usize, LedColor),
    Brightness(u8),
    Clear,
    Commit,
}

/// Bargraph that records every call and each committed frame
pub struct MockBargraph {
    pub staged: [LedColor; SEGMENT_COUNT],
    pub brightness: u8,
    pub calls: Vec<BargraphCall>,
    /// Brightness and segments at each commit
    pub commits: Vec<(u8, [LedColor; SEGMENT_COUNT])>,
    pub clears: usize,
}

impl MockBargraph {
    pub fn new() -> Self {
        Self {
            staged: [LedColor::Off; SEGMENT_COUNT],
            brightness: 0,
            calls: Vec::new(),
            commits: Vec::new(),
            clears: 0,
        }
    }
}

impl Bargraph for MockBargraph {
    fn set_segment(&mut self, index: usize, color: LedColor) -> Result<(), BargraphError> {
        let slot = self
            .staged
            .get_mut(index)
            .ok_or(BargraphError::InvalidSegment)?;
        *slot = color;
        self.calls.push(BargraphCall::Segment(index, color));
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), BargraphError> {
        self.brightness = level;
        self.calls.push(BargraphCall::Brightness(level));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BargraphError> {
        self.staged = [LedColor::Off; SEGMENT_COUNT];
        self.clears += 1;
        self.calls.push(BargraphCall::Clear);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), BargraphError> {
        self.commits.push((self.brightness, self.staged));
        self.calls.push(BargraphCall::Commit);
        Ok(())
    }
}

/// Button driven by a script of settled levels, one per read
pub struct MockButton {
    script: VecDeque<bool>,
    pressed: bool,
}

impl MockButton {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            pressed: false,
        }
    }

    /// Queue `reads` reads at the given level
    pub fn hold(&mut self, pressed: bool, reads: usize) {
        self.script.extend(std::iter::repeat(pressed).take(reads));
    }
}

impl DebouncedButton for MockButton {
    fn read(&mut self) -> ButtonEdge {
        let next = self.script.pop_front().unwrap_or(self.pressed);
        let edge = match (self.pressed, next) {
            (false, true) => ButtonEdge::Pressed,
            (true, false) => ButtonEdge::Released,
            _ => ButtonEdge::None,
        };
        self.pressed = next;
        edge
    }

    fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// Host link with a byte queue in each direction
pub struct MockLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Largest count `available` reports, to simulate trickling bytes
    pub max_available: Option<usize>,
    pub fail_reads: bool,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            max_available: None,
            fail_reads: false,
        }
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Everything written so far, as text
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }

    /// Written `\r\n`-terminated lines
    pub fn lines(&self) -> Vec<String> {
        self.output()
            .split_terminator("\r\n")
            .map(String::from)
            .collect()
    }
}

impl SerialLink for MockLink {
    fn available(&mut self) -> usize {
        match self.max_available {
            Some(max) => self.rx.len().min(max),
            None => self.rx.len(),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        if self.fail_reads || buf.len() > self.rx.len() {
            return Err(LinkError::Receive);
        }
        for slot in buf.iter_mut() {
            *slot = self.rx.pop_front().ok_or(LinkError::Receive)?;
        }
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.tx.extend_from_slice(data);
        Ok(())
    }
}

pub struct MockLed {
    pub on: bool,
}

impl MockLed {
    pub fn new() -> Self {
        Self { on: false }
    }
}

impl StatusLed for MockLed {
    fn set_on(&mut self) {
        self.on = true;
    }

    fn set_off(&mut self) {
        self.on = false;
    }
}
