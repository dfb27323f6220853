use tokio::sync::broadcast;

pub trait Shutdown {
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

#[derive(Clone)]
pub struct ShutdownChannel {
    shutdown: broadcast::Sender<()>,
}

impl ShutdownChannel {
    pub fn new(shutdown: broadcast::Sender<()>) -> Self {
        Self { shutdown }
    }

    /// Resolves once a shutdown is broadcast or every sender is gone.
    pub fn signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut receiver = self.subscribe();
        async move {
            let _ = receiver.recv().await;
        }
    }
}

impl Shutdown for ShutdownChannel {
    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }
}
