use std::{io::Write, time::Duration};

use tempfile::NamedTempFile;
use tokio::net::TcpListener;

use tlcp_core::{
    config::{ClientConfig, DEFAULT_CIPHER_SUITE},
    context,
    engine::{TlcpSession, VerifyPolicy},
};
use tlcp_engine_plain::{PlainEngine, PlainResponder};
use tlcp_net_tokio::{dial_tcp, DialError};

fn default_responder() -> PlainResponder {
    PlainResponder::new(
        vec![DEFAULT_CIPHER_SUITE.to_string()],
        b"self-signed peer identity".to_vec(),
    )
}

#[tokio::test]
async fn dial_handshake_and_exchange_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server_task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut peer = default_responder().accept(stream).await.unwrap();

        let mut buf = [0u8; 64];
        let n = peer.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"GET /\n\n");
        peer.send(b"HTTP/1.0 200 OK\r\n").await.unwrap();
    });

    let ctx = context::build(&PlainEngine::new(), &ClientConfig::default()).unwrap();
    let mut session = dial_tcp(&ctx, &addr, VerifyPolicy::SkipHostVerification)
        .await
        .unwrap();

    // Negotiated parameters are queryable immediately after establishment.
    let params = session.params();
    assert!(!params.version.is_empty());
    assert!(!params.cipher.is_empty());

    session.write(b"GET /\n\n").await.unwrap();
    let mut buf = [0u8; 64];
    let n = session.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"HTTP/1.0 200 OK\r\n");

    session.close().await;
    server_task.await.unwrap();
}

// Scenario: no CA file, skip-host-verification policy, and a peer whose
// identity chains to nothing. The dial must still succeed.
#[tokio::test]
async fn skip_verification_dials_an_unverifiable_peer() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server_task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        default_responder().accept(stream).await.unwrap();
    });

    let cfg = ClientConfig::default();
    assert_eq!(cfg.ca_file, None);

    let ctx = context::build(&PlainEngine::new(), &cfg).unwrap();
    let session = dial_tcp(&ctx, &addr, VerifyPolicy::SkipHostVerification)
        .await
        .unwrap();

    assert_eq!(session.version(), "NTLS");
    server_task.await.unwrap();
}

#[tokio::test]
async fn refused_connection_is_a_dial_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let ctx = context::build(&PlainEngine::new(), &ClientConfig::default()).unwrap();
    let err = dial_tcp(&ctx, &addr, VerifyPolicy::SkipHostVerification)
        .await
        .unwrap_err();

    assert!(matches!(err, DialError::Io(_)));
}

#[tokio::test]
async fn handshake_rejection_is_a_dial_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server_task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let responder = PlainResponder::new(
            vec!["ECDHE-SM2-SM4-GCM-SM3".to_string()],
            b"peer".to_vec(),
        );
        // Rejecting the initiator is the expected outcome here.
        let _ = responder.accept(stream).await;
    });

    let ctx = context::build(&PlainEngine::new(), &ClientConfig::default()).unwrap();
    let err = dial_tcp(&ctx, &addr, VerifyPolicy::SkipHostVerification)
        .await
        .unwrap_err();

    assert!(matches!(err, DialError::Engine(_)));
    server_task.await.unwrap();
}

// Fail-fast ordering: a configuration error means no network action at all.
#[tokio::test]
async fn no_dial_happens_after_a_configuration_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let mut bad_cert = NamedTempFile::new().unwrap();
    bad_cert.write_all(b"not pem at all\n").unwrap();
    bad_cert.flush().unwrap();

    let cfg = ClientConfig {
        sign_cert: Some(bad_cert.path().to_path_buf()),
        ..ClientConfig::default()
    };

    context::build(&PlainEngine::new(), &cfg).unwrap_err();

    // Nothing ever connected to the listener.
    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err());
}
