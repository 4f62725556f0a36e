//! Integration tests for the ring election: full runs through the driver and
//! a deterministic step-by-step replay of the protocol on a three-ring.

use ring_election::{
    ElectionDriver, ElectionError, InitiatorPolicy, Message, Network, Process, ProcessState,
    RingTopology,
};

async fn run_election(size: u32, policy: InitiatorPolicy) -> u32 {
    let topology = RingTopology::new(size).unwrap();
    let outcome = ElectionDriver::new(topology, policy).run().await.unwrap();
    assert_eq!(outcome.ring_size, size);
    outcome.winner_id
}

#[tokio::test]
async fn three_ring_with_two_initiators_elects_the_maximum() {
    let winner = run_election(3, InitiatorPolicy::Explicit(vec![0, 2])).await;
    assert_eq!(winner, 2);
}

#[tokio::test]
async fn silent_maximum_still_wins() {
    // Process 3 never initiates; it is drafted by the circulating election
    // and injects its own identifier anyway.
    let winner = run_election(4, InitiatorPolicy::Explicit(vec![0])).await;
    assert_eq!(winner, 3);
}

#[tokio::test]
async fn every_non_empty_initiator_subset_agrees_on_the_maximum() {
    // The initiator subset is a free parameter: sweep all 15 non-empty
    // subsets of a four-ring.
    for mask in 1u32..16 {
        let initiators: Vec<u32> = (0..4).filter(|id| mask & (1 << id) != 0).collect();
        let winner = run_election(4, InitiatorPolicy::Explicit(initiators.clone())).await;
        assert_eq!(winner, 3, "initiators {:?} elected {}", initiators, winner);
    }
}

#[tokio::test]
async fn all_processes_initiating_still_converges() {
    let winner = run_election(9, InitiatorPolicy::Explicit((0..9).collect())).await;
    assert_eq!(winner, 8);
}

#[tokio::test]
async fn even_identifier_policy_elects_the_maximum() {
    let winner = run_election(7, InitiatorPolicy::EveryEven).await;
    assert_eq!(winner, 6);
}

#[tokio::test]
async fn random_initiators_elect_the_maximum() {
    for _ in 0..10 {
        let winner = run_election(6, InitiatorPolicy::Random).await;
        assert_eq!(winner, 5);
    }
}

#[tokio::test]
async fn two_process_ring_fails_before_any_message() {
    let err = RingTopology::new(2).unwrap_err();
    assert!(matches!(err, ElectionError::Configuration(_)));
}

/// Replays the specified three-ring trace with initiators {0, 2} one message
/// at a time, checking every intermediate state.
#[tokio::test]
async fn three_ring_trace_step_by_step() {
    let topology = RingTopology::new(3).unwrap();
    let (net, mut mailboxes) = Network::new(&topology);

    let mut p0 = Process::new(0, &topology);
    let mut p1 = Process::new(1, &topology);
    let mut p2 = Process::new(2, &topology);

    // 0 and 2 self-initiate.
    p0.initiate(&net).unwrap();
    p2.initiate(&net).unwrap();

    // 1 (idle) is drafted by ELECTION(0): highest becomes 1, forwards to 2.
    let msg = mailboxes[1].try_receive_next().unwrap();
    assert_eq!(msg, Message::Election { candidate_id: 0 });
    p1.on_receive(msg, &net).unwrap();
    assert_eq!(p1.state(), ProcessState::Candidate { highest_known_id: 1 });

    // 0 (candidate) receives ELECTION(2) > 0: adopts and forwards to 1.
    let msg = mailboxes[0].try_receive_next().unwrap();
    assert_eq!(msg, Message::Election { candidate_id: 2 });
    p0.on_receive(msg, &net).unwrap();
    assert_eq!(p0.state(), ProcessState::Candidate { highest_known_id: 2 });

    // 2 receives ELECTION(1): weaker and not its own, absorbed.
    let msg = mailboxes[2].try_receive_next().unwrap();
    assert_eq!(msg, Message::Election { candidate_id: 1 });
    p2.on_receive(msg, &net).unwrap();
    assert_eq!(p2.state(), ProcessState::Candidate { highest_known_id: 2 });

    // 1 receives ELECTION(2) > 1: adopts and forwards to 2.
    let msg = mailboxes[1].try_receive_next().unwrap();
    assert_eq!(msg, Message::Election { candidate_id: 2 });
    p1.on_receive(msg, &net).unwrap();
    assert_eq!(p1.state(), ProcessState::Candidate { highest_known_id: 2 });

    // 2 receives its own candidacy back: originates ELECTED(2).
    let msg = mailboxes[2].try_receive_next().unwrap();
    assert_eq!(msg, Message::Election { candidate_id: 2 });
    p2.on_receive(msg, &net).unwrap();
    assert!(!p2.is_decided());

    // ELECTED(2) circulates: 0 decides and forwards, 1 decides and forwards,
    // 2 sees its own announcement return and stops.
    let msg = mailboxes[0].try_receive_next().unwrap();
    assert_eq!(msg, Message::Elected { winner_id: 2 });
    p0.on_receive(msg, &net).unwrap();
    assert!(p0.is_decided());

    let msg = mailboxes[1].try_receive_next().unwrap();
    assert_eq!(msg, Message::Elected { winner_id: 2 });
    p1.on_receive(msg, &net).unwrap();
    assert!(p1.is_decided());

    let msg = mailboxes[2].try_receive_next().unwrap();
    assert_eq!(msg, Message::Elected { winner_id: 2 });
    p2.on_receive(msg, &net).unwrap();
    assert!(p2.is_decided());

    // All three agree, and no message is left in flight.
    assert_eq!(p0.winner().unwrap(), 2);
    assert_eq!(p1.winner().unwrap(), 2);
    assert_eq!(p2.winner().unwrap(), 2);
    for mailbox in &mut mailboxes {
        assert_eq!(mailbox.try_receive_next(), None);
    }
}
