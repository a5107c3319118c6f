/// Abstract controls. The host maps keys/buttons onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Attack,
    Interact,
    Inventory,
}

impl Action {
    pub const COUNT: usize = 6;
    pub const ALL: [Action; Self::COUNT] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Attack,
        Action::Interact,
        Action::Inventory,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Input event types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ActionDown(Action),
    ActionUp(Action),
}

/// A queue of input events.
/// The host pushes events as they arrive; the world drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Held state plus press/release edges for the current tick.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    held: [bool; Action::COUNT],
    pressed: [bool; Action::COUNT],
    released: [bool; Action::COUNT],
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear edges. Held flags carry over between ticks.
    pub fn begin_tick(&mut self) {
        self.pressed = [false; Action::COUNT];
        self.released = [false; Action::COUNT];
    }

    /// Fold one event. Repeated downs while held do not produce a new press.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::ActionDown(action) => {
                let i = action.index();
                if !self.held[i] {
                    self.pressed[i] = true;
                }
                self.held[i] = true;
            }
            InputEvent::ActionUp(action) => {
                let i = action.index();
                if self.held[i] {
                    self.released[i] = true;
                }
                self.held[i] = false;
            }
        }
    }

    /// Start a new tick and fold everything queued since the last one.
    pub fn fold(&mut self, queue: &mut InputQueue) {
        self.begin_tick();
        for event in queue.drain() {
            self.apply(event);
        }
    }

    pub fn held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    pub fn released(&self, action: Action) -> bool {
        self.released[action.index()]
    }

    /// -1, 0 or +1 from the horizontal actions. Left wins when both are held.
    pub fn horizontal(&self) -> i32 {
        if self.held(Action::Left) {
            -1
        } else if self.held(Action::Right) {
            1
        } else {
            0
        }
    }
}
