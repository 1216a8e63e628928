//! Prompt builders
//!
//! The grounding instruction and the classification schema live here so the
//! agent crate only deals in assembled prompts.

use support_agent_core::ContextChunk;

/// Build the grounding instruction for an answer generation call.
///
/// Every selected chunk is annotated with its source document id, and the
/// directive requires the answer to be derivable only from that context,
/// conversational, and to cite the source id inline.
pub fn grounding_instruction(chunks: &[ContextChunk]) -> String {
    let mut instruction = String::from(
        "You are a friendly customer support assistant. Answer the customer's \
         question using ONLY the context entries below. Do not use outside \
         knowledge. Keep the tone conversational and cite the source id of \
         each entry you rely on inline, e.g. (Source: returns-policy). If the \
         context does not cover the question, say so briefly.\n\nContext:\n",
    );

    for (i, chunk) in chunks.iter().enumerate() {
        instruction.push_str(&format!(
            "{}. [source: {}] {}\n",
            i + 1,
            chunk.doc_id,
            chunk.text.trim()
        ));
    }

    instruction
}

/// System instruction for the classification call
pub fn classification_instruction() -> String {
    "You are an intent classifier for a customer support bot. Classify the \
     user's message into exactly one of these intents:\n\
     - \"Order_Status\": the user asks about a specific order. Extract the \
     order id (5-8 alphanumeric characters) into details.\n\
     - \"Product_Info\": the user asks about a specific product. Extract the \
     product name into details.\n\
     - \"RAG\": anything else (policies, shipping, returns, general support \
     questions). Set details to \"None\".\n\
     If the intent is Order_Status or Product_Info but no order id or product \
     name can be extracted, set details to \"General\". Respond with JSON \
     only."
        .to_string()
}

/// JSON schema constraining the classification output
pub fn classification_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "intent": {
                "type": "string",
                "enum": ["RAG", "Order_Status", "Product_Info"]
            },
            "details": {
                "type": "string"
            }
        },
        "required": ["intent", "details"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounding_instruction_annotates_sources() {
        let chunks = vec![
            ContextChunk::new("returns-policy", "Returns are accepted within 30 days."),
            ContextChunk::new("shipping-policy", "Standard shipping takes 3-5 days."),
        ];

        let instruction = grounding_instruction(&chunks);
        assert!(instruction.contains("[source: returns-policy]"));
        assert!(instruction.contains("[source: shipping-policy]"));
        assert!(instruction.contains("Returns are accepted within 30 days."));
        assert!(instruction.contains("ONLY the context"));
    }

    #[test]
    fn test_classification_schema_constrains_intents() {
        let schema = classification_schema();
        let labels = schema["properties"]["intent"]["enum"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(labels, vec!["RAG", "Order_Status", "Product_Info"]);
        assert!(schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == "intent"));
    }

    #[test]
    fn test_classification_instruction_names_sentinels() {
        let instruction = classification_instruction();
        assert!(instruction.contains("\"None\""));
        assert!(instruction.contains("\"General\""));
        assert!(instruction.contains("5-8 alphanumeric"));
    }
}
