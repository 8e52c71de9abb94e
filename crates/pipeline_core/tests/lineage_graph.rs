use pipeline_core::{
    build_lineage_graph, lineage_graph, NodeCategory, PipelineError, PipelineService,
    TaskStatus, TaskUpdate,
};

fn pipeline() -> PipelineService {
    let mut service = PipelineService::new();
    service.add_concern("Shared concern", 50).expect("concern should be added");
    service.add_concern("Other concern", 50).expect("concern should be added");
    service.add_question("Q1", "Shared concern", 50).expect("question should be added");
    service.add_question("Q2", "Other concern", 50).expect("question should be added");
    service.add_question("Q3", "Shared concern", 50).expect("question should be added");
    service
        .add_decision("Adopt Rust", "Safety", ["Q1", "Q2", "Q3"], 90)
        .expect("decision should be added");
    service.add_goal("Pilot", "Adopt Rust", 50).expect("goal should be added");
    service.add_goal("Train team", "Adopt Rust", 50).expect("goal should be added");
    service.add_task("Pick service", "Ana", "Pilot", 50).expect("task should be added");
    service.add_task("Book course", "Ben", "Train team", 50).expect("task should be added");
    service.add_task("Buy books", "Cy", "Train team", 50).expect("task should be added");
    service
}

#[test]
fn lineage_collects_ancestors_and_descendants_in_order() {
    let mut service = pipeline();
    service
        .update_task(
            "Buy books",
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
    let lineage = service.get_lineage("Adopt Rust").unwrap();

    assert_eq!(lineage.rationale, "Safety");
    let questions: Vec<_> = lineage
        .questions
        .iter()
        .map(|q| (q.question.as_str(), q.concern.as_str()))
        .collect();
    assert_eq!(
        questions,
        vec![
            ("Q1", "Shared concern"),
            ("Q2", "Other concern"),
            ("Q3", "Shared concern"),
        ]
    );
    assert_eq!(lineage.concerns, vec!["Shared concern", "Other concern"]);
    assert_eq!(lineage.goals[0].goal, "Pilot");
    assert_eq!(lineage.goals[1].tasks.len(), 2);
    assert_eq!(lineage.goals[1].tasks[1].status, TaskStatus::Completed);
}

#[test]
fn lineage_of_unknown_decision_is_not_found() {
    let service = pipeline();
    assert!(matches!(
        service.get_lineage("nope"),
        Err(PipelineError::NotFound { .. })
    ));
    assert!(lineage_graph(&service, "nope").is_empty());
}

#[test]
fn shared_concern_becomes_one_node_with_fanned_in_edges() {
    let service = pipeline();
    let graph = lineage_graph(&service, "Adopt Rust");
    graph.validate().unwrap();

    assert_eq!(graph.nodes_of(NodeCategory::Concern).count(), 2);
    assert_eq!(graph.nodes_of(NodeCategory::Question).count(), 3);
    let shared: Vec<&str> = graph.successors("c1").collect();
    assert_eq!(shared, vec!["q1", "q3"]);
    assert_eq!(graph.successors("c2").collect::<Vec<_>>(), vec!["q2"]);
    assert_eq!(graph.node("c1").unwrap().label, "Concern:\nShared concern");
}

#[test]
fn graph_ids_labels_and_edges_follow_the_lineage() {
    let service = pipeline();
    let lineage = service.get_lineage("Adopt Rust").unwrap();
    let graph = build_lineage_graph(&lineage);

    let ids: Vec<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["d1", "r1", "c1", "q1", "c2", "q2", "q3", "g1", "t1", "g2", "t2", "t3"]
    );
    assert_eq!(graph.node("d1").unwrap().label, "Decision:\nAdopt Rust");
    assert_eq!(graph.node("r1").unwrap().category, NodeCategory::Rationale);
    assert_eq!(
        graph.node("t3").unwrap().label,
        "Task:\nBuy books\nAssignee: Cy"
    );

    assert_eq!(graph.successors("d1").collect::<Vec<_>>(), vec!["r1", "g1", "g2"]);
    assert_eq!(graph.successors("q2").collect::<Vec<_>>(), vec!["d1"]);
    assert_eq!(graph.successors("g2").collect::<Vec<_>>(), vec!["t2", "t3"]);
    // 1 rationale + 3 concern->question + 3 question->decision + 2 goals + 3 tasks
    assert_eq!(graph.edges.len(), 12);
}
