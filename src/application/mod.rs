// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no classifier math, no printing,
// no direct file handling. Each use case wires the lower layers
// together for one command.

// Fit encoders + forest and persist them
pub mod train_use_case;

// Load artifacts once, answer rating requests, log them
pub mod predict_use_case;

// Read and migrate the prediction log
pub mod history_use_case;

// Describe the artifacts on disk
pub mod inspect_use_case;
