/// TextCNN: convolutions over word embeddings with max-over-time pooling
pub mod textcnn;
