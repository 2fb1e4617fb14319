use crate::executor::OrderExecutor;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::{Receiver, Sender};

#[async_trait]
pub trait StreamNode: Send + Sync {
    /// Run the node logic.
    /// `inputs`: A list of input channels.
    /// `outputs`: A list of output channels. The node can write to any of them.
    async fn run(&self, inputs: Vec<Receiver<Value>>, outputs: Vec<Sender<Value>>) -> Result<()>;
}

/// The order executor as a pipeline stage. Items are taken from input 0 one
/// at a time and each envelope is sent on output 0 before the next item is read.
pub struct PagarMeNode {
    executor: OrderExecutor,
}

impl PagarMeNode {
    pub fn new(executor: OrderExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl StreamNode for PagarMeNode {
    async fn run(&self, mut inputs: Vec<Receiver<Value>>, outputs: Vec<Sender<Value>>) -> Result<()> {
        if let Some(rx) = inputs.get_mut(0) {
            if let Some(tx) = outputs.first() {
                let mut index = 0;
                while let Some(data) = rx.recv().await {
                    let item = self.executor.process(index, &data).await?;
                    tx.send(serde_json::to_value(&item)?).await?;
                    index += 1;
                }
            }
        }
        Ok(())
    }
}
