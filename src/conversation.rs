use futures::stream::BoxStream;
use futures_util::StreamExt;

use crate::error::{Error, Result};
use crate::types::ConversationEvent;

/// Sent from a `Conversation` to the assistant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationInput {
    /// Encoded audio in the conversation's input encoding
    Audio(Vec<u8>),
    /// No more audio will be written
    End,
}

pub type InputTx = tokio::sync::mpsc::Sender<ConversationInput>;
pub type InputRx = tokio::sync::mpsc::Receiver<ConversationInput>;
pub type EventStream = BoxStream<'static, ConversationEvent>;

/// Handle to a single conversation with the assistant.
pub struct Conversation {
    input_tx: Option<InputTx>,
    events: EventStream,
}

impl Conversation {
    pub fn new(input_tx: InputTx, events: EventStream) -> Self {
        Self {
            input_tx: Some(input_tx),
            events,
        }
    }

    /// Builds a conversation whose events arrive on an mpsc channel.
    pub fn from_receiver(input_tx: InputTx, mut events: tokio::sync::mpsc::Receiver<ConversationEvent>) -> Self {
        let events = futures::stream::poll_fn(move |cx| events.poll_recv(cx)).boxed();
        Self::new(input_tx, events)
    }

    /// A conversation that replays a fixed list of events and accepts no audio.
    pub fn from_events(events: Vec<ConversationEvent>) -> Self {
        Self {
            input_tx: None,
            events: futures::stream::iter(events).boxed(),
        }
    }

    pub async fn write(&self, bytes: Vec<u8>) -> Result<()> {
        match self.input_tx {
            Some(ref tx) => tx
                .send(ConversationInput::Audio(bytes))
                .await
                .map_err(|_| Error::AssistantClosed),
            None => Err(Error::AssistantClosed),
        }
    }

    /// Tells the assistant no more audio is coming. Later writes fail.
    pub async fn end(&mut self) -> Result<()> {
        match self.input_tx.take() {
            Some(tx) => tx.send(ConversationInput::End).await.map_err(|_| Error::AssistantClosed),
            None => Ok(()),
        }
    }

    pub async fn next_event(&mut self) -> Option<ConversationEvent> {
        self.events.next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_audio_then_end() {
        let (input_tx, mut input_rx) = tokio::sync::mpsc::channel(4);
        let (_event_tx, event_rx) = tokio::sync::mpsc::channel(4);
        let mut conversation = Conversation::from_receiver(input_tx, event_rx);

        conversation.write(vec![1, 2]).await.expect("write");
        conversation.end().await.expect("end");

        assert_eq!(input_rx.recv().await, Some(ConversationInput::Audio(vec![1, 2])));
        assert_eq!(input_rx.recv().await, Some(ConversationInput::End));
        assert_eq!(conversation.write(vec![3]).await, Err(Error::AssistantClosed));
        // Ending twice is harmless.
        assert_eq!(conversation.end().await, Ok(()));
    }

    #[tokio::test]
    async fn events_come_from_the_receiver() {
        let (input_tx, _input_rx) = tokio::sync::mpsc::channel(1);
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(4);
        let mut conversation = Conversation::from_receiver(input_tx, event_rx);

        event_tx.send(ConversationEvent::Response("Sure".to_string())).await.expect("send");
        drop(event_tx);

        assert_eq!(conversation.next_event().await, Some(ConversationEvent::Response("Sure".to_string())));
        assert_eq!(conversation.next_event().await, None);
    }

    #[tokio::test]
    async fn replayed_conversation_rejects_audio() {
        let mut conversation = Conversation::from_events(vec![ConversationEvent::EndOfUtterance]);

        assert_eq!(conversation.write(vec![0]).await, Err(Error::AssistantClosed));
        assert_eq!(conversation.next_event().await, Some(ConversationEvent::EndOfUtterance));
        assert_eq!(conversation.next_event().await, None);
    }
}
