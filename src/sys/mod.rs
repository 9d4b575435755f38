// Host-facing contracts are public; concrete capabilities live beside them.

pub mod traits;     // Host + secret store contracts
pub mod secrets;    // Memory hygiene (SecretValue, StaticCredentials)
pub mod logs;       // Per-invocation transcript
pub mod aws;        // AWS Secrets Manager connector
pub mod host;       // Stand-alone host (parameters, buffers, actual values)
